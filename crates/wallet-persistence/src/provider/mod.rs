//! Persistence façade
//!
//! [`PersistenceProvider`] exposes one accessor per stored concept. Each
//! accessor resolves its key through [`StorageKey`] and delegates to the
//! injected [`Storage`] backend. Nothing is cached; every read goes to the
//! backend.

mod app;
mod bitpay;
mod gift_card;
mod network;
mod types;
mod wallet;

#[cfg(test)]
pub(crate) mod test_support;

pub use types::{
    BalanceCache, BitpayAccount, BitpayAccountData, BitpayAccounts, DebitCard, FeedbackValues,
    GiftCard, GiftCardMap,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::{PersistenceError, Result};
use crate::keys::{KeyScheme, StorageKey};
use crate::migration::{self, MigrationReport};
use crate::settings::{CompositeWrite, StorageSettings};
use crate::storage::{self, Storage};

/// 50 characters, repeated to build the quota probe
const QUOTA_BLOCK: &str = "12345678901234567890123456789012345678901234567890";
const QUOTA_BLOCK_REPEAT: usize = 1024 * 1024;

/// Typed accessors over a storage backend
pub struct PersistenceProvider {
    storage: Arc<dyn Storage>,
    scheme: KeyScheme,
    composite: CompositeWrite,
}

impl PersistenceProvider {
    /// Create a provider over an already opened backend
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        debug!("PersistenceProvider initialized on {}", storage.backend_name());
        Self {
            storage,
            scheme: KeyScheme::default(),
            composite: CompositeWrite::default(),
        }
    }

    /// Open the backend named by the settings and pick up its key scheme
    pub async fn open(settings: &StorageSettings) -> Result<Self> {
        let storage = storage::open(settings).await?;
        let marker = migration::stored_scheme_version(storage.as_ref()).await?;

        Ok(Self::new(storage)
            .with_scheme(KeyScheme::from_marker(marker))
            .with_composite_write(settings.composite_write))
    }

    pub fn with_scheme(mut self, scheme: KeyScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_composite_write(mut self, composite: CompositeWrite) -> Self {
        self.composite = composite;
        self
    }

    /// The backend this provider delegates to
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn scheme(&self) -> KeyScheme {
        self.scheme
    }

    pub fn composite_write(&self) -> CompositeWrite {
        self.composite
    }

    /// Resolve a concept to its key under this provider's scheme
    pub fn key(&self, key: StorageKey<'_>) -> String {
        key.to_key(self.scheme)
    }

    /// Scheme in force on the store
    ///
    /// A provider still on the legacy scheme consults the stored marker, so
    /// it follows a migration run after it was built.
    pub async fn effective_scheme(&self) -> Result<KeyScheme> {
        match self.scheme {
            KeyScheme::Current => Ok(KeyScheme::Current),
            KeyScheme::Legacy => Ok(KeyScheme::from_marker(
                migration::stored_scheme_version(self.storage.as_ref()).await?,
            )),
        }
    }

    /// Migrate legacy gift-card keys and switch this provider to the current scheme
    pub async fn migrate_legacy_gift_cards(&mut self) -> Result<MigrationReport> {
        let report = migration::migrate_legacy_gift_cards(self.storage.as_ref()).await?;
        self.scheme = KeyScheme::Current;
        Ok(report)
    }

    async fn get<T: DeserializeOwned>(&self, key: StorageKey<'_>) -> Result<Option<T>> {
        self.get_at(&self.key(key)).await
    }

    async fn get_at<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.storage.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn set<T: Serialize + ?Sized>(&self, key: StorageKey<'_>, value: &T) -> Result<()> {
        self.set_at(&self.key(key), value).await
    }

    async fn set_at<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.storage.set(key, value).await?;
        Ok(())
    }

    async fn remove(&self, key: StorageKey<'_>) -> Result<()> {
        self.storage.remove(&self.key(key)).await?;
        Ok(())
    }

    /// Write back the result of a read-modify-write
    ///
    /// `read` is the raw value the update was computed from.
    async fn write_back<T: Serialize>(
        &self,
        key: &str,
        read: Option<&Value>,
        updated: &T,
    ) -> Result<()> {
        let value = serde_json::to_value(updated)?;

        match self.composite {
            CompositeWrite::LastWriterWins => self.storage.set(key, value).await?,
            CompositeWrite::CompareAndSwap => {
                if !self.storage.compare_and_set(key, read, value).await? {
                    warn!("Concurrent update of {} detected, write rejected", key);
                    return Err(PersistenceError::Conflict {
                        key: key.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Probe available capacity by writing a 50 MiB value
    ///
    /// Failures are logged and never returned. The probe value is removed
    /// again once the write succeeds.
    pub async fn check_quota(&self) {
        let key = self.key(StorageKey::QuotaProbe);
        let block = QUOTA_BLOCK.repeat(QUOTA_BLOCK_REPEAT);

        match self.storage.set(&key, Value::String(block)).await {
            Ok(()) => {
                debug!("CheckQuota: {} bytes accepted", QUOTA_BLOCK.len() * QUOTA_BLOCK_REPEAT);
                if let Err(e) = self.storage.remove(&key).await {
                    warn!("CheckQuota: could not remove probe value: {}", e);
                }
            }
            Err(e) => error!("CheckQuota Return: {}", e),
        }
    }
}
