//! Storage trait definitions

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageResult;

/// Key-value capability the persistence façade is built on
#[async_trait]
pub trait Storage: Send + Sync {
    /// Retrieve a value by key; a missing key is `Ok(None)`
    async fn get(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Store a value, overwriting any previous one
    async fn set(&self, key: &str, value: Value) -> StorageResult<()>;

    /// Store a value for the first time
    ///
    /// What happens when the key already exists is up to the backend.
    async fn create(&self, key: &str, value: Value) -> StorageResult<()>;

    /// Delete a value; deleting a missing key succeeds
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Write `new` only if the stored value still equals `expected`
    ///
    /// `expected == None` means the key must be absent. Returns whether the
    /// write happened.
    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> StorageResult<bool>;

    /// List all keys with a given prefix
    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
