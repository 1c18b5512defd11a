//! One-shot migration of legacy gift-card keys
//!
//! Before the migration runs, gift cards of a few historical brands are read
//! and written under legacy key names. The migration moves that data to the
//! synthesized `giftCards-{brand}-{network}` keys and records the new scheme
//! version, after which providers opened on the store use
//! [`KeyScheme::Current`]. It is never run implicitly.

use serde_json::json;
use tracing::{debug, info};

use crate::error::Result;
use crate::keys::{KeyScheme, StorageKey, LEGACY_GIFT_CARD_KEYS};
use crate::storage::Storage;

/// What a migration run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// `(legacy key, current key)` pairs whose data was moved
    pub moved: Vec<(String, String)>,
    /// Legacy keys dropped because the current key already held data
    pub discarded: Vec<String>,
    /// Whether the store had already been migrated
    pub already_current: bool,
}

/// Read the stored scheme version, if any
pub async fn stored_scheme_version(storage: &dyn Storage) -> Result<Option<u64>> {
    let marker = StorageKey::KeySchemeMarker.to_string();
    Ok(storage.get(&marker).await?.and_then(|v| v.as_u64()))
}

/// Move legacy gift-card data to the current key names
pub async fn migrate_legacy_gift_cards(storage: &dyn Storage) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    if KeyScheme::from_marker(stored_scheme_version(storage).await?) == KeyScheme::Current {
        debug!("Key scheme already current, nothing to migrate");
        report.already_current = true;
        return Ok(report);
    }

    for (brand, network, legacy_key) in LEGACY_GIFT_CARD_KEYS {
        let Some(value) = storage.get(legacy_key).await? else {
            continue;
        };

        let current_key = StorageKey::GiftCards { brand, network }.to_key(KeyScheme::Current);

        if storage.get(&current_key).await?.is_some() {
            report.discarded.push(legacy_key.to_string());
        } else {
            storage.set(&current_key, value).await?;
            report.moved.push((legacy_key.to_string(), current_key));
        }

        storage.remove(legacy_key).await?;
    }

    storage
        .set(
            &StorageKey::KeySchemeMarker.to_string(),
            json!(KeyScheme::CURRENT_VERSION),
        )
        .await?;

    info!(
        "Migrated legacy gift-card keys: {} moved, {} discarded",
        report.moved.len(),
        report.discarded.len()
    );
    Ok(report)
}
