//! Records persisted by the façade

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Feedback prompt state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackValues {
    /// Unix timestamp of the last prompt
    pub time: i64,
    /// App version the prompt was shown for
    pub version: String,
    pub sent: bool,
}

/// Last balance seen for a wallet or card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceCache {
    /// Unix timestamp in seconds
    pub updated_on: i64,
    pub balance: String,
}

/// BitPay debit card attached to an account
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitCard {
    /// External card id
    pub eid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_four_digits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Owning account; filled in when cards are listed across accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Fields this version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DebitCard {
    pub fn new(eid: &str) -> Self {
        Self {
            eid: eid.to_string(),
            ..Default::default()
        }
    }
}

/// Stored BitPay account
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitpayAccount {
    pub token: String,
    /// Last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// First name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<DebitCard>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input for [`set_bitpay_account`](crate::PersistenceProvider::set_bitpay_account)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitpayAccountData {
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
}

/// BitPay accounts of one network, keyed by email in insertion order
pub type BitpayAccounts = IndexMap<String, BitpayAccount>;

/// Gift card record; its shape is owned by the gift-card service
pub type GiftCard = Value;

/// Gift cards of one brand, keyed by invoice id
pub type GiftCardMap = IndexMap<String, GiftCard>;
