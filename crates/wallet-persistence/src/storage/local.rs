//! Local storage backend
//!
//! Mirrors a browser-local store: a flat map of string values under a fixed
//! byte quota. The map can be mirrored to a single JSON document so it
//! survives restarts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

use super::Storage;
use crate::error::{StorageError, StorageResult};

/// Default quota, matching common browser limits
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// On-disk format of a persisted local store
#[derive(Debug, Serialize, Deserialize)]
struct StorageFile {
    version: u32,
    entries: HashMap<String, String>,
}

/// Local storage backend
pub struct LocalStorage {
    /// Map of key -> serialized value
    entries: RwLock<HashMap<String, String>>,
    /// Maximum bytes of keys plus values
    quota_bytes: usize,
    /// Where the map is mirrored, if anywhere
    file_path: Option<PathBuf>,
}

impl LocalStorage {
    /// Create a local store that lives only in memory
    pub fn in_memory(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes,
            file_path: None,
        }
    }

    /// Open a local store mirrored to `file_path`, loading existing entries
    pub async fn open(file_path: PathBuf, quota_bytes: usize) -> StorageResult<Self> {
        let entries = if tokio::fs::try_exists(&file_path).await? {
            let contents = tokio::fs::read_to_string(&file_path).await?;
            let file: StorageFile = serde_json::from_str(&contents)?;
            debug!("Loaded {} entries from local storage", file.entries.len());
            file.entries
        } else {
            debug!("No existing local storage file found");
            HashMap::new()
        };

        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        Ok(Self {
            entries: RwLock::new(entries),
            quota_bytes,
            file_path: Some(file_path),
        })
    }

    /// Bytes currently used by keys and values
    pub async fn used_bytes(&self) -> usize {
        let entries = self.entries.read().await;
        usage(&entries)
    }

    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Insert into the map if the quota allows it
    fn insert_within_quota(
        &self,
        entries: &mut HashMap<String, String>,
        key: &str,
        value: &Value,
    ) -> StorageResult<()> {
        let serialized = serde_json::to_string(value)?;
        let previous = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
        let used = usage(entries) - previous;
        let needed = key.len() + serialized.len();

        if used + needed > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                needed,
                available: self.quota_bytes.saturating_sub(used),
            });
        }

        entries.insert(key.to_string(), serialized);
        Ok(())
    }

    /// Save the map to disk
    async fn save(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let file = StorageFile {
            version: 1,
            entries: entries.clone(),
        };
        let contents = serde_json::to_string(&file)?;

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, path).await?;

        debug!("Saved {} entries to local storage", entries.len());
        Ok(())
    }

    /// Apply `change` to the map, keeping it only once it is saved
    ///
    /// A mirrored store edits a copy and swaps it in after the file write
    /// succeeds, so a failed save leaves the map as it was.
    async fn commit<F>(&self, entries: &mut HashMap<String, String>, change: F) -> StorageResult<()>
    where
        F: FnOnce(&mut HashMap<String, String>) -> StorageResult<()>,
    {
        if self.file_path.is_none() {
            return change(entries);
        }

        let mut staged = entries.clone();
        change(&mut staged)?;
        self.save(&staged).await?;
        *entries = staged;
        Ok(())
    }
}

fn usage(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

#[async_trait]
impl Storage for LocalStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        self.commit(&mut entries, |staged| self.insert_within_quota(staged, key, &value))
            .await?;
        debug!("Stored key in local storage: {}", key);
        Ok(())
    }

    /// Same as `set`; a local store has no notion of first-time creation
    async fn create(&self, key: &str, value: Value) -> StorageResult<()> {
        self.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(key) {
            self.commit(&mut entries, |staged| {
                staged.remove(key);
                Ok(())
            })
            .await?;
            debug!("Removed key from local storage: {}", key);
        }
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> StorageResult<bool> {
        let mut entries = self.entries.write().await;
        let current: Option<Value> = match entries.get(key) {
            Some(raw) => Some(serde_json::from_str(raw)?),
            None => None,
        };
        if current.as_ref() != expected {
            return Ok(false);
        }
        self.commit(&mut entries, |staged| self.insert_within_quota(staged, key, &new))
            .await?;
        Ok(true)
    }

    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn backend_name(&self) -> &'static str {
        "Local Storage"
    }
}
