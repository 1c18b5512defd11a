//! Storage backends for the persistence façade
//!
//! Three backends implement [`Storage`]:
//! 1. File storage (device builds, one file per key)
//! 2. Local storage (browser-style string map with a quota)
//! 3. Memory storage (ephemeral)

mod traits;
mod file;
mod local;
mod memory;

pub use traits::Storage;
pub use file::FileStorage;
pub use local::{LocalStorage, DEFAULT_QUOTA_BYTES};
pub use memory::MemoryStorage;

use std::sync::Arc;
use tracing::info;

use crate::error::StorageResult;
use crate::settings::{BackendKind, StorageSettings};

/// Build the backend selected by the settings
pub async fn open(settings: &StorageSettings) -> StorageResult<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match settings.backend {
        BackendKind::File => {
            let dir = match &settings.data_dir {
                Some(dir) => dir.join("storage"),
                None => FileStorage::default_dir()?,
            };
            Arc::new(FileStorage::with_dir(dir)?)
        }
        BackendKind::Local => {
            let path = match &settings.data_dir {
                Some(dir) => dir.join("local-storage.json"),
                None => FileStorage::default_dir()?.with_file_name("local-storage.json"),
            };
            Arc::new(LocalStorage::open(path, settings.local_quota_bytes).await?)
        }
        BackendKind::Memory => Arc::new(MemoryStorage::new()),
    };

    info!("Opened {}", storage.backend_name());
    Ok(storage)
}
