//! BitPay account registry
//!
//! All accounts of a network live under one key. Every mutation reads the
//! whole registry, edits it in memory, and writes it back. Two concurrent
//! mutations of the same network can both read the same registry; under
//! [`CompositeWrite::LastWriterWins`] one of the updates is then lost, under
//! [`CompositeWrite::CompareAndSwap`] the later write fails with
//! [`PersistenceError::Conflict`].
//!
//! [`CompositeWrite::LastWriterWins`]: crate::settings::CompositeWrite::LastWriterWins
//! [`CompositeWrite::CompareAndSwap`]: crate::settings::CompositeWrite::CompareAndSwap

use serde_json::Value;
use tracing::info;

use super::{BitpayAccountData, BitpayAccounts, DebitCard, PersistenceProvider};
use crate::error::{PersistenceError, Result};
use crate::keys::{Network, StorageKey};

impl PersistenceProvider {
    /// The registry of a network; a stored `null` reads as no registry
    pub async fn get_bitpay_accounts(&self, network: Network) -> Result<Option<BitpayAccounts>> {
        let key = self.key(StorageKey::BitpayAccounts(network));
        let (_, accounts) = self.read_bitpay_accounts(&key).await?;
        Ok(accounts)
    }

    /// Read the registry for a read-modify-write, keeping the raw value
    async fn read_bitpay_accounts(
        &self,
        key: &str,
    ) -> Result<(Option<Value>, Option<BitpayAccounts>)> {
        let raw = self.storage.get(key).await?;
        let accounts = match &raw {
            Some(Value::Null) | None => None,
            Some(value) => Some(serde_json::from_value(value.clone())?),
        };
        Ok((raw, accounts))
    }

    /// Insert or update the account for `data.email`, keeping its cards
    pub async fn set_bitpay_account(&self, network: Network, data: BitpayAccountData) -> Result<()> {
        let key = self.key(StorageKey::BitpayAccounts(network));
        let (raw, accounts) = self.read_bitpay_accounts(&key).await?;
        let mut accounts = accounts.unwrap_or_default();

        let account = accounts.entry(data.email.clone()).or_default();
        account.token = data.token;
        account.family_name = data.family_name;
        account.given_name = data.given_name;

        info!("Storing BitPay accounts with new account: {}", data.email);
        self.write_back(&key, raw.as_ref(), &accounts).await
    }

    pub async fn remove_bitpay_account(&self, network: Network, email: &str) -> Result<()> {
        let key = self.key(StorageKey::BitpayAccounts(network));
        let (raw, accounts) = self.read_bitpay_accounts(&key).await?;
        let Some(mut accounts) = accounts else {
            return Ok(());
        };

        accounts.shift_remove(email);

        self.write_back(&key, raw.as_ref(), &accounts).await
    }

    /// Replace the cards of an existing account
    ///
    /// Fails with [`PersistenceError::UnknownAccount`] without writing when
    /// no account for `email` exists on the network.
    pub async fn set_bitpay_debit_cards(
        &self,
        network: Network,
        email: &str,
        cards: Vec<DebitCard>,
    ) -> Result<()> {
        let key = self.key(StorageKey::BitpayAccounts(network));
        let (raw, accounts) = self.read_bitpay_accounts(&key).await?;
        let mut accounts = accounts.unwrap_or_default();

        let account = accounts
            .get_mut(email)
            .ok_or_else(|| PersistenceError::UnknownAccount(email.to_string()))?;
        account.cards = Some(cards);

        self.write_back(&key, raw.as_ref(), &accounts).await
    }

    /// All cards of all accounts, each stamped with its account email
    pub async fn get_bitpay_debit_cards(&self, network: Network) -> Result<Vec<DebitCard>> {
        let accounts = self.get_bitpay_accounts(network).await?.unwrap_or_default();

        let cards = accounts
            .into_iter()
            .flat_map(|(email, account)| {
                account.cards.unwrap_or_default().into_iter().map(move |mut card| {
                    card.email = Some(email.clone());
                    card
                })
            })
            .collect();

        Ok(cards)
    }

    /// Drop the card with external id `eid` from every account
    pub async fn remove_bitpay_debit_card(&self, network: Network, eid: &str) -> Result<()> {
        let key = self.key(StorageKey::BitpayAccounts(network));
        let (raw, accounts) = self.read_bitpay_accounts(&key).await?;
        let Some(mut accounts) = accounts else {
            return Ok(());
        };

        for account in accounts.values_mut() {
            if let Some(cards) = account.cards.as_mut() {
                cards.retain(|card| card.eid != eid);
            }
        }

        self.write_back(&key, raw.as_ref(), &accounts).await
    }
}
