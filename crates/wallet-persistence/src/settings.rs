//! Persistence settings
//!
//! Stores the backend choice and its tuning in a plain JSON file so the same
//! configuration is picked up by the library and the CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PersistenceError, Result};
use crate::storage::DEFAULT_QUOTA_BYTES;

/// Which storage backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One file per key (device builds)
    #[default]
    File,
    /// Browser-style local store with a quota
    Local,
    /// Nothing persisted
    Memory,
}

/// How composite accessors write back their read-modify-write result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CompositeWrite {
    /// Write unconditionally; concurrent updates can be lost
    #[default]
    LastWriterWins,
    /// Write only if the value read is still current, else fail with a conflict
    CompareAndSwap,
}

/// Persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Settings file version
    pub version: u32,
    /// Backend to open
    pub backend: BackendKind,
    /// Override for the data directory (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Quota for the local backend
    pub local_quota_bytes: usize,
    /// Write-back policy for composite accessors
    pub composite_write: CompositeWrite,
}

impl StorageSettings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: 1,
            backend: BackendKind::File,
            data_dir: None,
            local_quota_bytes: DEFAULT_QUOTA_BYTES,
            composite_write: CompositeWrite::LastWriterWins,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: StorageSettings,
}

impl SettingsManager {
    /// Create a settings manager for `settings.json` in `config_dir`
    pub fn new(config_dir: &Path) -> Result<Self> {
        let settings_file = config_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<StorageSettings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(StorageSettings::new());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| PersistenceError::Settings(format!("{}: {}", path.display(), e)))?;
        let settings: StorageSettings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::Settings(e.to_string()))?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| PersistenceError::Settings(e.to_string()))?;
        tokio::fs::rename(&temp_path, &self.settings_file)
            .await
            .map_err(|e| PersistenceError::Settings(e.to_string()))?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &StorageSettings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut StorageSettings {
        &mut self.settings
    }

    /// Update settings and save
    pub async fn update(&mut self, settings: StorageSettings) -> Result<()> {
        self.settings = settings;
        self.save().await
    }

    /// Reset settings to defaults and delete settings file
    pub async fn reset(&mut self) -> Result<()> {
        self.settings = StorageSettings::default();

        if self.settings_file.exists() {
            tokio::fs::remove_file(&self.settings_file)
                .await
                .map_err(|e| PersistenceError::Settings(e.to_string()))?;
        }

        Ok(())
    }
}
