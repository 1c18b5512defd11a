//! Gift-card records

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{GiftCardMap, PersistenceProvider};
use crate::error::Result;
use crate::keys::{Network, StorageKey};

impl PersistenceProvider {
    pub async fn get_active_gift_cards<T: DeserializeOwned>(&self, network: Network) -> Result<Option<T>> {
        self.get(StorageKey::ActiveGiftCards(network)).await
    }

    pub async fn set_active_gift_cards<T: Serialize>(&self, network: Network, data: &T) -> Result<()> {
        self.set(StorageKey::ActiveGiftCards(network), data).await
    }

    pub async fn get_gift_card_config_cache<T: DeserializeOwned>(&self, network: Network) -> Result<Option<T>> {
        self.get(StorageKey::GiftCardConfigCache(network)).await
    }

    pub async fn set_gift_card_config_cache<T: Serialize>(&self, network: Network, data: &T) -> Result<()> {
        self.set(StorageKey::GiftCardConfigCache(network), data).await
    }

    pub async fn remove_gift_card_config_cache(&self, network: Network) -> Result<()> {
        self.remove(StorageKey::GiftCardConfigCache(network)).await
    }

    pub async fn set_gift_card_user_info<T: Serialize>(&self, data: &T) -> Result<()> {
        self.set(StorageKey::GiftCardUserInfo, data).await
    }

    pub async fn get_gift_card_user_info<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.get(StorageKey::GiftCardUserInfo).await
    }

    pub async fn remove_gift_card_user_info(&self) -> Result<()> {
        self.remove(StorageKey::GiftCardUserInfo).await
    }

    pub async fn set_hide_gift_card_discount_item(&self, hide: bool) -> Result<()> {
        self.set(StorageKey::HideGiftCardDiscountItem, &hide).await
    }

    pub async fn get_hide_gift_card_discount_item(&self) -> Result<Option<bool>> {
        self.get(StorageKey::HideGiftCardDiscountItem).await
    }

    pub async fn remove_hide_gift_card_discount_item(&self) -> Result<()> {
        self.remove(StorageKey::HideGiftCardDiscountItem).await
    }

    /// Key holding the gift cards of one brand on a network
    pub async fn gift_cards_key(&self, brand: &str, network: Network) -> Result<String> {
        let scheme = self.effective_scheme().await?;
        Ok(StorageKey::GiftCards { brand, network }.to_key(scheme))
    }

    /// Store the gift cards of one brand
    pub async fn set_gift_cards(&self, brand: &str, network: Network, cards: &GiftCardMap) -> Result<()> {
        let key = self.gift_cards_key(brand, network).await?;
        self.set_at(&key, cards).await
    }

    pub async fn get_gift_cards(&self, brand: &str, network: Network) -> Result<Option<GiftCardMap>> {
        let key = self.gift_cards_key(brand, network).await?;
        self.get_at(&key).await
    }
}
