//! Error types for wallet-persistence

use thiserror::Error;

/// Result type alias for façade operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Result type alias for backend operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded: needed {needed} bytes, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("Key already exists: {0}")]
    AlreadyExists(String),

    #[error("Permission denied for key: {0}")]
    PermissionDenied(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors raised by the persistence façade
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot set cards for unknown account {0}")]
    UnknownAccount(String),

    #[error("Concurrent modification of {key} - write rejected")]
    Conflict { key: String },

    #[error("Index {index} out of range for {len} wallets")]
    InvalidIndex { index: usize, len: usize },

    #[error("Settings error: {0}")]
    Settings(String),
}

impl PersistenceError {
    /// Whether this error came from the backend rather than the façade itself
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
