//! Backend wrappers for exercising races and partial failures

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Barrier;

use crate::error::{StorageError, StorageResult};
use crate::storage::{MemoryStorage, Storage};

/// Holds the first `n` reads at a barrier until all `n` have read
pub struct GatedStorage {
    pub inner: MemoryStorage,
    barrier: Barrier,
    gated: usize,
    reads: AtomicUsize,
}

impl GatedStorage {
    pub fn new(n: usize) -> Self {
        Self {
            inner: MemoryStorage::new(),
            barrier: Barrier::new(n),
            gated: n,
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Storage for GatedStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        let value = self.inner.get(key).await;
        if self.reads.fetch_add(1, Ordering::SeqCst) < self.gated {
            self.barrier.wait().await;
        }
        value
    }

    async fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        self.inner.set(key, value).await
    }

    async fn create(&self, key: &str, value: Value) -> StorageResult<()> {
        self.inner.create(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> StorageResult<bool> {
        self.inner.compare_and_set(key, expected, new).await
    }

    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.inner.list_keys(prefix).await
    }

    fn backend_name(&self) -> &'static str {
        "Gated Storage"
    }
}

/// Fails every operation on one key
pub struct FailingStorage {
    pub inner: MemoryStorage,
    fail_key: String,
}

impl FailingStorage {
    pub fn new(fail_key: &str) -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_key: fail_key.to_string(),
        }
    }

    fn check(&self, key: &str) -> StorageResult<()> {
        if key == self.fail_key {
            return Err(StorageError::PermissionDenied(key.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        self.check(key)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn create(&self, key: &str, value: Value) -> StorageResult<()> {
        self.check(key)?;
        self.inner.create(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.check(key)?;
        self.inner.remove(key).await
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> StorageResult<bool> {
        self.check(key)?;
        self.inner.compare_and_set(key, expected, new).await
    }

    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.inner.list_keys(prefix).await
    }

    fn backend_name(&self) -> &'static str {
        "Failing Storage"
    }
}
