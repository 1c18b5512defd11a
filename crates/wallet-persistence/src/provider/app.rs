//! Profile, key registry, and app-wide flags

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{FeedbackValues, PersistenceProvider};
use crate::error::Result;
use crate::keys::StorageKey;

const SERVER_MESSAGE_DISMISSED: &str = "dismissed";

impl PersistenceProvider {
    pub async fn store_profile_legacy<T: Serialize>(&self, profile_old: &T) -> Result<()> {
        self.set(StorageKey::ProfileOld, profile_old).await
    }

    pub async fn get_profile_legacy<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.get(StorageKey::ProfileOld).await
    }

    pub async fn remove_profile_legacy(&self) -> Result<()> {
        self.remove(StorageKey::ProfileOld).await
    }

    /// First-time profile creation, through the backend's `create`
    pub async fn store_new_profile<T: Serialize>(&self, profile: &T) -> Result<()> {
        let value = serde_json::to_value(profile)?;
        self.storage
            .create(&self.key(StorageKey::Profile), value)
            .await?;
        Ok(())
    }

    pub async fn store_profile<T: Serialize>(&self, profile: &T) -> Result<()> {
        self.set(StorageKey::Profile, profile).await
    }

    pub async fn get_profile<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.get(StorageKey::Profile).await
    }

    /// Store the key registry
    pub async fn set_keys<T: Serialize>(&self, keys: &[T]) -> Result<()> {
        self.set(StorageKey::Keys, keys).await
    }

    pub async fn get_keys<T: DeserializeOwned>(&self) -> Result<Option<Vec<T>>> {
        self.get(StorageKey::Keys).await
    }

    pub async fn set_feedback_info(&self, feedback: &FeedbackValues) -> Result<()> {
        self.set(StorageKey::Feedback, feedback).await
    }

    pub async fn get_feedback_info(&self) -> Result<Option<FeedbackValues>> {
        self.get(StorageKey::Feedback).await
    }

    pub async fn set_survey_flag(&self) -> Result<()> {
        self.set(StorageKey::Survey, &true).await
    }

    pub async fn get_survey_flag(&self) -> Result<Option<bool>> {
        self.get(StorageKey::Survey).await
    }

    pub async fn set_eth_live_card_flag(&self) -> Result<()> {
        self.set(StorageKey::EthLiveCard, &true).await
    }

    pub async fn get_eth_live_card_flag(&self) -> Result<Option<bool>> {
        self.get(StorageKey::EthLiveCard).await
    }

    /// `None` is stored as an empty string
    pub async fn store_focused_wallet_id(&self, wallet_id: Option<&str>) -> Result<()> {
        self.set(StorageKey::FocusedWalletId, wallet_id.unwrap_or(""))
            .await
    }

    pub async fn get_focused_wallet_id(&self) -> Result<Option<String>> {
        self.get(StorageKey::FocusedWalletId).await
    }

    pub async fn set_clean_and_scan_addresses(&self, wallet_id: &str) -> Result<()> {
        self.set(StorageKey::CleanAndScanAddresses, wallet_id).await
    }

    pub async fn get_clean_and_scan_addresses(&self) -> Result<Option<String>> {
        self.get(StorageKey::CleanAndScanAddresses).await
    }

    pub async fn remove_clean_and_scan_addresses(&self) -> Result<()> {
        self.remove(StorageKey::CleanAndScanAddresses).await
    }

    pub async fn get_config<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.get(StorageKey::Config).await
    }

    pub async fn store_config<T: Serialize>(&self, config: &T) -> Result<()> {
        self.set(StorageKey::Config, config).await
    }

    pub async fn clear_config(&self) -> Result<()> {
        self.remove(StorageKey::Config).await
    }

    pub async fn set_disclaimer_accepted(&self) -> Result<()> {
        self.set(StorageKey::AgreeDisclaimer, &true).await
    }

    pub async fn get_disclaimer_flag(&self) -> Result<Option<bool>> {
        self.get(StorageKey::AgreeDisclaimer).await
    }

    pub async fn set_remote_prefs_stored_flag(&self) -> Result<()> {
        self.set(StorageKey::RemotePrefStored, &true).await
    }

    pub async fn get_remote_prefs_stored_flag(&self) -> Result<Option<bool>> {
        self.get(StorageKey::RemotePrefStored).await
    }

    pub async fn set_last_currency_used(&self, currency: &str) -> Result<()> {
        self.set(StorageKey::LastCurrencyUsed, currency).await
    }

    pub async fn get_last_currency_used(&self) -> Result<Option<String>> {
        self.get(StorageKey::LastCurrencyUsed).await
    }

    pub async fn set_lock_status(&self, status: &str) -> Result<()> {
        self.set(StorageKey::LockStatus, status).await
    }

    pub async fn get_lock_status(&self) -> Result<Option<String>> {
        self.get(StorageKey::LockStatus).await
    }

    pub async fn remove_lock_status(&self) -> Result<()> {
        self.remove(StorageKey::LockStatus).await
    }

    pub async fn set_email_law_compliance(&self, value: &str) -> Result<()> {
        self.set(StorageKey::EmailLawCompliance, value).await
    }

    pub async fn get_email_law_compliance(&self) -> Result<Option<String>> {
        self.get(StorageKey::EmailLawCompliance).await
    }

    pub async fn remove_email_law_compliance(&self) -> Result<()> {
        self.remove(StorageKey::EmailLawCompliance).await
    }

    pub async fn set_hidden_features_flag(&self, value: &str) -> Result<()> {
        debug!("Hidden features: {}", value);
        self.set(StorageKey::HiddenFeatures, value).await
    }

    pub async fn get_hidden_features_flag(&self) -> Result<Option<String>> {
        self.get(StorageKey::HiddenFeatures).await
    }

    pub async fn remove_hidden_features_flag(&self) -> Result<()> {
        self.remove(StorageKey::HiddenFeatures).await
    }

    pub async fn set_server_message_dismissed(&self, message_id: &str) -> Result<()> {
        self.set(
            StorageKey::ServerMessageDismissed(message_id),
            SERVER_MESSAGE_DISMISSED,
        )
        .await
    }

    pub async fn get_server_message_dismissed(&self, message_id: &str) -> Result<Option<String>> {
        self.get(StorageKey::ServerMessageDismissed(message_id)).await
    }

    pub async fn remove_server_message_dismissed(&self, message_id: &str) -> Result<()> {
        self.remove(StorageKey::ServerMessageDismissed(message_id)).await
    }
}
