//! # wallet-persistence
//!
//! Persistence layer for the wallet app:
//! - Key namespace mapping every stored concept to one storage key
//! - File, local (quota-bound), and in-memory storage backends
//! - `PersistenceProvider` façade with typed accessors per concept
//! - Explicit migration of legacy gift-card keys

pub mod error;
pub mod keys;
pub mod migration;
pub mod provider;
pub mod settings;
pub mod storage;

pub use error::{PersistenceError, Result, StorageError, StorageResult};
pub use keys::{legacy_gift_card_key, KeyScheme, Network, StorageKey};
pub use migration::{migrate_legacy_gift_cards, MigrationReport};
pub use provider::{
    BalanceCache, BitpayAccount, BitpayAccountData, BitpayAccounts, DebitCard, FeedbackValues,
    GiftCard, GiftCardMap, PersistenceProvider,
};
pub use settings::{BackendKind, CompositeWrite, SettingsManager, StorageSettings};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, Storage};
