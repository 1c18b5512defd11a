//! Storage key namespace
//!
//! Every stored concept is a variant of [`StorageKey`] carrying the
//! discriminators it needs. The key string is produced by one exhaustive
//! match, so each concept has exactly one naming rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bitcoin network a network-scoped record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Livenet,
    Testnet,
}

impl Network {
    /// Both networks, livenet first
    pub const ALL: [Network; 2] = [Network::Livenet, Network::Testnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Livenet => "livenet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "livenet" => Ok(Network::Livenet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!("unknown network: {}", other)),
        }
    }
}

/// Naming rules in force for a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyScheme {
    /// Gift cards of historical brands resolve to their legacy keys
    #[default]
    Legacy,
    /// Legacy gift-card keys have been migrated; every brand uses the synthesized key
    Current,
}

impl KeyScheme {
    /// Marker value written once legacy keys have been migrated
    pub const CURRENT_VERSION: u64 = 2;

    /// Scheme implied by the stored marker value
    pub fn from_marker(version: Option<u64>) -> Self {
        match version {
            Some(v) if v >= Self::CURRENT_VERSION => KeyScheme::Current,
            _ => KeyScheme::Legacy,
        }
    }
}

/// Legacy gift-card keys, exact match on `(brand, network)`
pub const LEGACY_GIFT_CARD_KEYS: [(&str, Network, &str); 6] = [
    ("Amazon.com", Network::Livenet, "amazonGiftCards-livenet"),
    ("Amazon.com", Network::Testnet, "amazonGiftCards-testnet"),
    ("Amazon.co.jp", Network::Livenet, "amazonGiftCards-livenet-japan"),
    ("Amazon.co.jp", Network::Testnet, "amazonGiftCards-testnet-japan"),
    ("Mercado Livre", Network::Livenet, "MercadoLibreGiftCards-livenet"),
    ("Mercado Livre", Network::Testnet, "MercadoLibreGiftCards-testnet"),
];

/// Look up the legacy key for a gift-card brand on a network
pub fn legacy_gift_card_key(brand: &str, network: Network) -> Option<&'static str> {
    LEGACY_GIFT_CARD_KEYS
        .iter()
        .find(|(b, n, _)| *b == brand && *n == network)
        .map(|(_, _, key)| *key)
}

/// A stored concept together with its discriminators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey<'a> {
    AddressBook(Network),
    AgreeDisclaimer,
    /// Kept under the historical `amazonUserInfo` name
    GiftCardUserInfo,
    AppIdentity(Network),
    Backup(&'a str),
    BackupWalletGroup(&'a str),
    BalanceCache(&'a str),
    BitpayAccounts(Network),
    CleanAndScanAddresses,
    CoinbaseRefreshToken(Network),
    CoinbaseToken(Network),
    CoinbaseTxs(Network),
    Config,
    Feedback,
    Survey,
    EthLiveCard,
    FocusedWalletId,
    GiftCardConfigCache(Network),
    ActiveGiftCards(Network),
    GiftCards { brand: &'a str, network: Network },
    HideGiftCardDiscountItem,
    HideBalance(&'a str),
    HideWallet(&'a str),
    Keys,
    LastAddress(&'a str),
    LastCurrencyUsed,
    Profile,
    ProfileOld,
    RemotePrefStored,
    TxConfirmNotif(&'a str),
    TxHistory(&'a str),
    WalletOrder(&'a str),
    ServerMessageDismissed(&'a str),
    Shapeshift(Network),
    ShapeshiftToken(Network),
    WalletGroupName(&'a str),
    LockStatus,
    EmailLawCompliance,
    HiddenFeatures,
    QuotaProbe,
    KeySchemeMarker,
}

impl StorageKey<'_> {
    /// Render the key string under the given naming scheme
    pub fn to_key(&self, scheme: KeyScheme) -> String {
        match *self {
            StorageKey::AddressBook(n) => format!("addressbook-{}", n),
            StorageKey::AgreeDisclaimer => "agreeDisclaimer".to_string(),
            StorageKey::GiftCardUserInfo => "amazonUserInfo".to_string(),
            StorageKey::AppIdentity(n) => format!("appIdentity-{}", n),
            StorageKey::Backup(wallet_id) => format!("backup-{}", wallet_id),
            StorageKey::BackupWalletGroup(key_id) => format!("walletGroupBackup-{}", key_id),
            StorageKey::BalanceCache(id) => format!("balanceCache-{}", id),
            StorageKey::BitpayAccounts(n) => format!("bitpayAccounts-v2-{}", n),
            StorageKey::CleanAndScanAddresses => "CleanAndScanAddresses".to_string(),
            StorageKey::CoinbaseRefreshToken(n) => format!("coinbaseRefreshToken-{}", n),
            StorageKey::CoinbaseToken(n) => format!("coinbaseToken-{}", n),
            StorageKey::CoinbaseTxs(n) => format!("coinbaseTxs-{}", n),
            StorageKey::Config => "config".to_string(),
            StorageKey::Feedback => "feedback".to_string(),
            StorageKey::Survey => "survey".to_string(),
            StorageKey::EthLiveCard => "ethLiveCard".to_string(),
            StorageKey::FocusedWalletId => "focusedWalletId".to_string(),
            StorageKey::GiftCardConfigCache(n) => match n {
                Network::Livenet => "giftCardConfigCache".to_string(),
                other => format!("giftCardConfigCache-{}", other),
            },
            StorageKey::ActiveGiftCards(n) => format!("activeGiftCards-{}", n),
            StorageKey::GiftCards { brand, network } => {
                let legacy = match scheme {
                    KeyScheme::Legacy => legacy_gift_card_key(brand, network),
                    KeyScheme::Current => None,
                };
                match legacy {
                    Some(key) => key.to_string(),
                    None => format!("giftCards-{}-{}", brand, network),
                }
            }
            StorageKey::HideGiftCardDiscountItem => "hideGiftCardDiscountItem".to_string(),
            StorageKey::HideBalance(wallet_id) => format!("hideBalance-{}", wallet_id),
            StorageKey::HideWallet(wallet_id) => format!("hideWallet-{}", wallet_id),
            StorageKey::Keys => "keys".to_string(),
            StorageKey::LastAddress(wallet_id) => format!("lastAddress-{}", wallet_id),
            StorageKey::LastCurrencyUsed => "lastCurrencyUsed".to_string(),
            StorageKey::Profile => "profile".to_string(),
            StorageKey::ProfileOld => "profileOld".to_string(),
            StorageKey::RemotePrefStored => "remotePrefStored".to_string(),
            StorageKey::TxConfirmNotif(txid) => format!("txConfirmNotif-{}", txid),
            StorageKey::TxHistory(wallet_id) => format!("txsHistory-{}", wallet_id),
            StorageKey::WalletOrder(wallet_id) => format!("order-{}", wallet_id),
            StorageKey::ServerMessageDismissed(id) => format!("serverMessageDismissed-{}", id),
            StorageKey::Shapeshift(n) => format!("shapeShift-{}", n),
            StorageKey::ShapeshiftToken(n) => format!("shapeshiftToken-{}", n),
            StorageKey::WalletGroupName(key_id) => format!("Key-{}", key_id),
            StorageKey::LockStatus => "lockStatus".to_string(),
            StorageKey::EmailLawCompliance => "emailLawCompliance".to_string(),
            StorageKey::HiddenFeatures => "hiddenFeatures".to_string(),
            StorageKey::QuotaProbe => "test".to_string(),
            StorageKey::KeySchemeMarker => "persistenceKeyScheme".to_string(),
        }
    }
}

impl fmt::Display for StorageKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key(KeyScheme::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_concepts<'a>(id: &'a str, network: Network) -> Vec<StorageKey<'a>> {
        vec![
            StorageKey::AddressBook(network),
            StorageKey::AgreeDisclaimer,
            StorageKey::GiftCardUserInfo,
            StorageKey::AppIdentity(network),
            StorageKey::Backup(id),
            StorageKey::BackupWalletGroup(id),
            StorageKey::BalanceCache(id),
            StorageKey::BitpayAccounts(network),
            StorageKey::CleanAndScanAddresses,
            StorageKey::CoinbaseRefreshToken(network),
            StorageKey::CoinbaseToken(network),
            StorageKey::CoinbaseTxs(network),
            StorageKey::Config,
            StorageKey::Feedback,
            StorageKey::Survey,
            StorageKey::EthLiveCard,
            StorageKey::FocusedWalletId,
            StorageKey::GiftCardConfigCache(network),
            StorageKey::ActiveGiftCards(network),
            StorageKey::GiftCards { brand: id, network },
            StorageKey::HideGiftCardDiscountItem,
            StorageKey::HideBalance(id),
            StorageKey::HideWallet(id),
            StorageKey::Keys,
            StorageKey::LastAddress(id),
            StorageKey::LastCurrencyUsed,
            StorageKey::Profile,
            StorageKey::ProfileOld,
            StorageKey::RemotePrefStored,
            StorageKey::TxConfirmNotif(id),
            StorageKey::TxHistory(id),
            StorageKey::WalletOrder(id),
            StorageKey::ServerMessageDismissed(id),
            StorageKey::Shapeshift(network),
            StorageKey::ShapeshiftToken(network),
            StorageKey::WalletGroupName(id),
            StorageKey::LockStatus,
            StorageKey::EmailLawCompliance,
            StorageKey::HiddenFeatures,
            StorageKey::QuotaProbe,
            StorageKey::KeySchemeMarker,
        ]
    }

    #[test]
    fn test_keys_are_distinct_across_concepts() {
        for network in Network::ALL {
            for id in ["w1", "Amazon.com", "", "abc-def"] {
                let concepts = all_concepts(id, network);
                let keys: HashSet<String> = concepts.iter().map(|k| k.to_string()).collect();
                assert_eq!(keys.len(), concepts.len(), "collision for id {:?} on {}", id, network);
            }
        }
    }

    #[test]
    fn test_keys_are_distinct_across_discriminators() {
        let ids = [
            "", "a", "b", "w1", "Amazon.com", "Amazon.co.jp", "Mercado Livre", "x-livenet",
            "x-livenet-testnet", "livenet", "Key-1", "backup-a", "v2-livenet",
        ];

        for scheme in [KeyScheme::Legacy, KeyScheme::Current] {
            let mut concepts: Vec<StorageKey<'_>> = Vec::new();
            for id in ids {
                for network in Network::ALL {
                    for concept in all_concepts(id, network) {
                        if !concepts.contains(&concept) {
                            concepts.push(concept);
                        }
                    }
                }
            }

            let mut seen = HashSet::new();
            for concept in &concepts {
                let key = concept.to_key(scheme);
                assert!(seen.insert(key.clone()), "{:?} reuses key {} under {:?}", concept, key, scheme);
            }
        }

        assert_ne!(StorageKey::Backup("a").to_string(), StorageKey::BackupWalletGroup("b").to_string());
        assert_ne!(
            StorageKey::GiftCards { brand: "x-livenet", network: Network::Testnet }.to_string(),
            StorageKey::GiftCards { brand: "x", network: Network::Livenet }.to_string()
        );
    }

    #[test]
    fn test_keys_are_stable() {
        for concept in all_concepts("wallet-7", Network::Testnet) {
            assert_eq!(concept.to_string(), concept.to_string());
            assert_eq!(concept.to_key(KeyScheme::Legacy), concept.to_string());
        }
    }

    #[test]
    fn test_templates() {
        assert_eq!(StorageKey::AddressBook(Network::Livenet).to_string(), "addressbook-livenet");
        assert_eq!(StorageKey::TxHistory("w1").to_string(), "txsHistory-w1");
        assert_eq!(StorageKey::WalletOrder("w1").to_string(), "order-w1");
        assert_eq!(StorageKey::WalletGroupName("k1").to_string(), "Key-k1");
        assert_eq!(
            StorageKey::BitpayAccounts(Network::Testnet).to_string(),
            "bitpayAccounts-v2-testnet"
        );
        assert_eq!(StorageKey::GiftCardUserInfo.to_string(), "amazonUserInfo");
        assert_eq!(StorageKey::Shapeshift(Network::Livenet).to_string(), "shapeShift-livenet");
    }

    #[test]
    fn test_gift_card_config_cache_suffix() {
        assert_eq!(
            StorageKey::GiftCardConfigCache(Network::Livenet).to_string(),
            "giftCardConfigCache"
        );
        assert_eq!(
            StorageKey::GiftCardConfigCache(Network::Testnet).to_string(),
            "giftCardConfigCache-testnet"
        );
    }

    #[test]
    fn test_legacy_gift_card_keys() {
        let amazon = StorageKey::GiftCards { brand: "Amazon.com", network: Network::Livenet };
        assert_eq!(amazon.to_string(), "amazonGiftCards-livenet");

        let mercado = StorageKey::GiftCards { brand: "Mercado Livre", network: Network::Testnet };
        assert_eq!(mercado.to_string(), "MercadoLibreGiftCards-testnet");

        let japan = StorageKey::GiftCards { brand: "Amazon.co.jp", network: Network::Livenet };
        assert_eq!(japan.to_string(), "amazonGiftCards-livenet-japan");

        let new_brand = StorageKey::GiftCards { brand: "SomeNewBrand", network: Network::Livenet };
        assert_eq!(new_brand.to_string(), "giftCards-SomeNewBrand-livenet");
    }

    #[test]
    fn test_legacy_lookup_is_exact_match() {
        assert_eq!(legacy_gift_card_key("Amazon.co", Network::Livenet), None);
        assert_eq!(legacy_gift_card_key("amazon.com", Network::Livenet), None);
        assert_eq!(legacy_gift_card_key("Amazon.com ", Network::Livenet), None);
        assert_eq!(
            legacy_gift_card_key("Amazon.com", Network::Testnet),
            Some("amazonGiftCards-testnet")
        );
    }

    #[test]
    fn test_current_scheme_ignores_legacy_table() {
        let amazon = StorageKey::GiftCards { brand: "Amazon.com", network: Network::Livenet };
        assert_eq!(amazon.to_key(KeyScheme::Current), "giftCards-Amazon.com-livenet");
        assert_eq!(StorageKey::Profile.to_key(KeyScheme::Current), "profile");
    }

    #[test]
    fn test_scheme_from_marker() {
        assert_eq!(KeyScheme::from_marker(None), KeyScheme::Legacy);
        assert_eq!(KeyScheme::from_marker(Some(1)), KeyScheme::Legacy);
        assert_eq!(KeyScheme::from_marker(Some(2)), KeyScheme::Current);
    }

    #[test]
    fn test_network_parse_and_serde() {
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert!("regtest".parse::<Network>().is_err());
        assert_eq!(serde_json::to_string(&Network::Livenet).unwrap(), "\"livenet\"");
    }
}
