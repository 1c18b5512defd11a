//! Per-wallet and per-wallet-group records

use chrono::Utc;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use super::{BalanceCache, PersistenceProvider};
use crate::error::{PersistenceError, Result};
use crate::keys::StorageKey;

impl PersistenceProvider {
    pub async fn get_last_address(&self, wallet_id: &str) -> Result<Option<String>> {
        self.get(StorageKey::LastAddress(wallet_id)).await
    }

    pub async fn store_last_address(&self, wallet_id: &str, address: &str) -> Result<()> {
        self.set(StorageKey::LastAddress(wallet_id), address).await
    }

    pub async fn clear_last_address(&self, wallet_id: &str) -> Result<()> {
        self.remove(StorageKey::LastAddress(wallet_id)).await
    }

    /// Mark a wallet as backed up now (milliseconds since the epoch)
    pub async fn set_backup_flag(&self, wallet_id: &str) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        self.set(StorageKey::Backup(wallet_id), &now).await
    }

    pub async fn get_backup_flag(&self, wallet_id: &str) -> Result<Option<i64>> {
        self.get(StorageKey::Backup(wallet_id)).await
    }

    pub async fn clear_backup_flag(&self, wallet_id: &str) -> Result<()> {
        self.remove(StorageKey::Backup(wallet_id)).await
    }

    /// Mark a wallet group as backed up, at `timestamp` or now
    pub async fn set_backup_group_flag(&self, key_id: &str, timestamp: Option<i64>) -> Result<()> {
        let timestamp = timestamp.unwrap_or_else(|| Utc::now().timestamp_millis());
        self.set(StorageKey::BackupWalletGroup(key_id), &timestamp)
            .await
    }

    pub async fn get_backup_group_flag(&self, key_id: &str) -> Result<Option<i64>> {
        self.get(StorageKey::BackupWalletGroup(key_id)).await
    }

    pub async fn clear_backup_group_flag(&self, key_id: &str) -> Result<()> {
        self.remove(StorageKey::BackupWalletGroup(key_id)).await
    }

    pub async fn set_hide_balance_flag(&self, wallet_id: &str, hide: bool) -> Result<()> {
        self.set(StorageKey::HideBalance(wallet_id), &hide).await
    }

    pub async fn get_hide_balance_flag(&self, wallet_id: &str) -> Result<Option<bool>> {
        self.get(StorageKey::HideBalance(wallet_id)).await
    }

    pub async fn set_hide_wallet_flag(&self, wallet_id: &str, hide: bool) -> Result<()> {
        self.set(StorageKey::HideWallet(wallet_id), &hide).await
    }

    pub async fn get_hide_wallet_flag(&self, wallet_id: &str) -> Result<Option<bool>> {
        self.get(StorageKey::HideWallet(wallet_id)).await
    }

    pub async fn set_tx_history<T: Serialize>(&self, wallet_id: &str, txs: &[T]) -> Result<()> {
        let result = self.set(StorageKey::TxHistory(wallet_id), txs).await;
        if let Err(e) = &result {
            error!("Error saving tx History. Size: {}", txs.len());
            error!("{}", e);
        }
        result
    }

    pub async fn get_tx_history<T: DeserializeOwned>(&self, wallet_id: &str) -> Result<Option<Vec<T>>> {
        self.get(StorageKey::TxHistory(wallet_id)).await
    }

    pub async fn remove_tx_history(&self, wallet_id: &str) -> Result<()> {
        self.remove(StorageKey::TxHistory(wallet_id)).await
    }

    pub async fn set_wallet_order(&self, wallet_id: &str, order: u32) -> Result<()> {
        self.set(StorageKey::WalletOrder(wallet_id), &order).await
    }

    pub async fn get_wallet_order(&self, wallet_id: &str) -> Result<Option<u32>> {
        self.get(StorageKey::WalletOrder(wallet_id)).await
    }

    pub async fn remove_wallet_order(&self, wallet_id: &str) -> Result<()> {
        self.remove(StorageKey::WalletOrder(wallet_id)).await
    }

    pub async fn set_tx_confirm_notification(&self, txid: &str, enabled: bool) -> Result<()> {
        self.set(StorageKey::TxConfirmNotif(txid), &enabled).await
    }

    pub async fn get_tx_confirm_notification(&self, txid: &str) -> Result<Option<bool>> {
        self.get(StorageKey::TxConfirmNotif(txid)).await
    }

    pub async fn remove_tx_confirm_notification(&self, txid: &str) -> Result<()> {
        self.remove(StorageKey::TxConfirmNotif(txid)).await
    }

    /// Cache a balance stamped with the current time in seconds
    pub async fn set_last_known_balance(&self, id: &str, balance: &str) -> Result<()> {
        let cache = BalanceCache {
            updated_on: Utc::now().timestamp(),
            balance: balance.to_string(),
        };
        self.set(StorageKey::BalanceCache(id), &cache).await
    }

    pub async fn get_last_known_balance(&self, id: &str) -> Result<Option<BalanceCache>> {
        self.get(StorageKey::BalanceCache(id)).await
    }

    pub async fn remove_last_known_balance(&self, id: &str) -> Result<()> {
        self.remove(StorageKey::BalanceCache(id)).await
    }

    pub async fn set_wallet_group_name(&self, key_id: &str, name: &str) -> Result<()> {
        self.set(StorageKey::WalletGroupName(key_id), name).await
    }

    pub async fn get_wallet_group_name(&self, key_id: &str) -> Result<Option<String>> {
        self.get(StorageKey::WalletGroupName(key_id)).await
    }

    pub async fn remove_wallet_group_name(&self, key_id: &str) -> Result<()> {
        self.remove(StorageKey::WalletGroupName(key_id)).await
    }

    /// Remove last address, tx history, backup flag, and order of a wallet
    ///
    /// All four removals run independently; a failure does not stop the
    /// others and nothing is rolled back. The first failure is returned once
    /// every removal has finished.
    pub async fn remove_all_wallet_data(&self, wallet_id: &str) -> Result<()> {
        let (last_address, tx_history, backup, order) = futures::join!(
            self.clear_last_address(wallet_id),
            self.remove_tx_history(wallet_id),
            self.clear_backup_flag(wallet_id),
            self.remove_wallet_order(wallet_id),
        );

        let mut first_error = None;
        for (what, result) in [
            ("last address", last_address),
            ("tx history", tx_history),
            ("backup flag", backup),
            ("wallet order", order),
        ] {
            if let Err(e) = result {
                warn!("Could not remove {} of wallet {}: {}", what, wallet_id, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub async fn remove_all_wallet_group_data(&self, key_id: &str) -> Result<()> {
        self.clear_backup_group_flag(key_id).await
    }

    /// Move the wallet at `from` to `to` and persist the new order
    ///
    /// Every wallet gets its new index written; the first write failure is
    /// returned after all writes have finished.
    pub async fn reorder_wallets(
        &self,
        wallet_ids: &[String],
        from: usize,
        to: usize,
    ) -> Result<Vec<String>> {
        let len = wallet_ids.len();
        for index in [from, to] {
            if index >= len {
                return Err(PersistenceError::InvalidIndex { index, len });
            }
        }

        let mut ordered = wallet_ids.to_vec();
        let moved = ordered.remove(from);
        ordered.insert(to, moved);

        let results = join_all(
            ordered
                .iter()
                .enumerate()
                .map(|(index, id)| self.set_wallet_order(id, index as u32)),
        )
        .await;
        results.into_iter().collect::<Result<Vec<()>>>()?;

        Ok(ordered)
    }
}
