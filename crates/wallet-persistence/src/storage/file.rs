//! File storage backend
//!
//! Device backend. Each key lives in its own JSON file inside the data
//! directory; writes go through a temp file and a rename.

use async_trait::async_trait;
use directories::ProjectDirs;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::Storage;
use crate::error::{StorageError, StorageResult};

const FILE_EXTENSION: &str = ".json";

/// File storage backend
pub struct FileStorage {
    /// Directory holding one file per key
    storage_dir: PathBuf,
    /// Serialises writers so compare-and-set sees a stable value
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a file storage in the default data directory
    pub fn new() -> StorageResult<Self> {
        Self::with_dir(Self::default_dir()?)
    }

    /// Create with a custom storage directory
    pub fn with_dir(storage_dir: PathBuf) -> StorageResult<Self> {
        std::fs::create_dir_all(&storage_dir)?;

        debug!("File storage initialized at: {:?}", storage_dir);

        Ok(Self {
            storage_dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Get the default storage directory
    pub fn default_dir() -> StorageResult<PathBuf> {
        ProjectDirs::from("com", "wallet-persistence", "wallet")
            .map(|dirs| dirs.data_dir().join("storage"))
            .ok_or_else(|| StorageError::Backend("Could not determine data directory".to_string()))
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.storage_dir.join(format!("{}{}", encode_key(key), FILE_EXTENSION))
    }

    async fn read(&self, key: &str) -> StorageResult<Option<Value>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    /// Write atomically using a temp file
    async fn write(&self, key: &str, value: &Value) -> StorageResult<()> {
        let contents = serde_json::to_string(value)?;
        let path = self.path_for(key);
        let temp_path = self.storage_dir.join(format!("{}.tmp", encode_key(key)));

        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| io_error(key, e))?;

        debug!("Stored key in file: {} ({} bytes)", key, contents.len());
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        self.read(key).await
    }

    async fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write(key, &value).await
    }

    async fn create(&self, key: &str, value: Value) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(self.path_for(key)).await? {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }
        self.write(key, &value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => {
                debug!("Deleted key file: {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&Value>,
        new: Value,
    ) -> StorageResult<bool> {
        let _guard = self.write_lock.lock().await;
        let current = self.read(key).await?;
        if current.as_ref() != expected {
            return Ok(false);
        }
        self.write(key, &new).await?;
        Ok(true)
    }

    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut dir = tokio::fs::read_dir(&self.storage_dir).await?;
        let mut keys = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(encoded) = name.strip_suffix(FILE_EXTENSION) else { continue };
            if let Some(key) = decode_key(encoded) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn backend_name(&self) -> &'static str {
        "File Storage"
    }
}

fn io_error(key: &str, e: std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::PermissionDenied => StorageError::PermissionDenied(key.to_string()),
        _ => StorageError::Io(e),
    }
}

/// Map a key to a file name: bytes outside `[A-Za-z0-9._-]` and a leading
/// `.` become `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, byte) in key.bytes().enumerate() {
        let safe = byte.is_ascii_alphanumeric()
            || byte == b'-'
            || byte == b'_'
            || (byte == b'.' && i > 0);
        if safe {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn decode_key(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
