//! Network-scoped records: exchange tokens, address book, app identity

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::PersistenceProvider;
use crate::error::Result;
use crate::keys::{Network, StorageKey};

impl PersistenceProvider {
    pub async fn set_coinbase_token(&self, network: Network, token: &str) -> Result<()> {
        self.set(StorageKey::CoinbaseToken(network), token).await
    }

    pub async fn get_coinbase_token(&self, network: Network) -> Result<Option<String>> {
        self.get(StorageKey::CoinbaseToken(network)).await
    }

    pub async fn remove_coinbase_token(&self, network: Network) -> Result<()> {
        self.remove(StorageKey::CoinbaseToken(network)).await
    }

    pub async fn set_coinbase_refresh_token(&self, network: Network, token: &str) -> Result<()> {
        self.set(StorageKey::CoinbaseRefreshToken(network), token).await
    }

    pub async fn get_coinbase_refresh_token(&self, network: Network) -> Result<Option<String>> {
        self.get(StorageKey::CoinbaseRefreshToken(network)).await
    }

    pub async fn remove_coinbase_refresh_token(&self, network: Network) -> Result<()> {
        self.remove(StorageKey::CoinbaseRefreshToken(network)).await
    }

    pub async fn set_coinbase_txs<T: Serialize>(&self, network: Network, txs: &T) -> Result<()> {
        self.set(StorageKey::CoinbaseTxs(network), txs).await
    }

    pub async fn get_coinbase_txs<T: DeserializeOwned>(&self, network: Network) -> Result<Option<T>> {
        self.get(StorageKey::CoinbaseTxs(network)).await
    }

    pub async fn remove_coinbase_txs(&self, network: Network) -> Result<()> {
        self.remove(StorageKey::CoinbaseTxs(network)).await
    }

    pub async fn set_address_book<T: Serialize>(&self, network: Network, address_book: &T) -> Result<()> {
        self.set(StorageKey::AddressBook(network), address_book).await
    }

    pub async fn get_address_book<T: DeserializeOwned>(&self, network: Network) -> Result<Option<T>> {
        self.get(StorageKey::AddressBook(network)).await
    }

    pub async fn remove_address_book(&self, network: Network) -> Result<()> {
        self.remove(StorageKey::AddressBook(network)).await
    }

    pub async fn set_app_identity<T: Serialize>(&self, network: Network, identity: &T) -> Result<()> {
        self.set(StorageKey::AppIdentity(network), identity).await
    }

    pub async fn get_app_identity<T: DeserializeOwned>(&self, network: Network) -> Result<Option<T>> {
        self.get(StorageKey::AppIdentity(network)).await
    }

    pub async fn remove_app_identity(&self, network: Network) -> Result<()> {
        self.remove(StorageKey::AppIdentity(network)).await
    }

    pub async fn set_shapeshift<T: Serialize>(&self, network: Network, data: &T) -> Result<()> {
        self.set(StorageKey::Shapeshift(network), data).await
    }

    pub async fn get_shapeshift<T: DeserializeOwned>(&self, network: Network) -> Result<Option<T>> {
        self.get(StorageKey::Shapeshift(network)).await
    }

    pub async fn remove_shapeshift(&self, network: Network) -> Result<()> {
        self.remove(StorageKey::Shapeshift(network)).await
    }

    pub async fn set_shapeshift_token(&self, network: Network, token: &str) -> Result<()> {
        self.set(StorageKey::ShapeshiftToken(network), token).await
    }

    pub async fn get_shapeshift_token(&self, network: Network) -> Result<Option<String>> {
        self.get(StorageKey::ShapeshiftToken(network)).await
    }

    pub async fn remove_shapeshift_token(&self, network: Network) -> Result<()> {
        self.remove(StorageKey::ShapeshiftToken(network)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Contact {
        name: String,
        address: String,
    }

    fn test_provider() -> (PersistenceProvider, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (PersistenceProvider::new(storage.clone()), storage)
    }

    #[tokio::test]
    async fn test_coinbase_tokens_are_per_network() {
        let (provider, storage) = test_provider();

        provider.set_coinbase_token(Network::Livenet, "live").await.unwrap();
        provider.set_coinbase_refresh_token(Network::Testnet, "refresh").await.unwrap();

        assert_eq!(storage.get("coinbaseToken-livenet").await.unwrap(), Some(json!("live")));
        assert_eq!(provider.get_coinbase_token(Network::Testnet).await.unwrap(), None);
        assert_eq!(
            provider.get_coinbase_refresh_token(Network::Testnet).await.unwrap().as_deref(),
            Some("refresh")
        );

        provider.remove_coinbase_token(Network::Livenet).await.unwrap();
        provider.remove_coinbase_refresh_token(Network::Testnet).await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_coinbase_txs_round_trip() {
        let (provider, _) = test_provider();
        let txs = json!({"tx1": {"status": "pending"}});

        provider.set_coinbase_txs(Network::Livenet, &txs).await.unwrap();
        assert_eq!(provider.get_coinbase_txs::<Value>(Network::Livenet).await.unwrap(), Some(txs));

        provider.remove_coinbase_txs(Network::Livenet).await.unwrap();
        assert_eq!(provider.get_coinbase_txs::<Value>(Network::Livenet).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_address_book_typed_round_trip() {
        let (provider, storage) = test_provider();
        let mut book = BTreeMap::new();
        book.insert(
            "bc1qabc".to_string(),
            Contact {
                name: "Alice".to_string(),
                address: "bc1qabc".to_string(),
            },
        );

        provider.set_address_book(Network::Testnet, &book).await.unwrap();

        assert!(storage.get("addressbook-testnet").await.unwrap().is_some());
        assert_eq!(
            provider
                .get_address_book::<BTreeMap<String, Contact>>(Network::Testnet)
                .await
                .unwrap(),
            Some(book)
        );

        provider.remove_address_book(Network::Testnet).await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_app_identity_round_trip() {
        let (provider, _) = test_provider();
        let identity = json!({"pubkey": "02ab", "priv": "secret"});

        provider.set_app_identity(Network::Livenet, &identity).await.unwrap();
        assert_eq!(
            provider.get_app_identity::<Value>(Network::Livenet).await.unwrap(),
            Some(identity)
        );

        provider.remove_app_identity(Network::Livenet).await.unwrap();
        assert_eq!(provider.get_app_identity::<Value>(Network::Livenet).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_shapeshift_keys() {
        let (provider, storage) = test_provider();

        provider.set_shapeshift(Network::Livenet, &json!([{"orderId": "o1"}])).await.unwrap();
        provider.set_shapeshift_token(Network::Livenet, "tok").await.unwrap();

        assert!(storage.get("shapeShift-livenet").await.unwrap().is_some());
        assert_eq!(storage.get("shapeshiftToken-livenet").await.unwrap(), Some(json!("tok")));
        assert_eq!(
            provider.get_shapeshift_token(Network::Livenet).await.unwrap().as_deref(),
            Some("tok")
        );
        assert!(provider.get_shapeshift::<Value>(Network::Livenet).await.unwrap().is_some());

        provider.remove_shapeshift(Network::Livenet).await.unwrap();
        provider.remove_shapeshift_token(Network::Livenet).await.unwrap();
        assert!(storage.is_empty().await);
    }
}
