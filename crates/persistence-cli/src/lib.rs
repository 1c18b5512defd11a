//! # persistence-cli
//!
//! Operator commands over a wallet persistence store: raw key access,
//! the capacity probe, and the legacy gift-card migration.

mod commands;

pub use commands::{execute, Command};
