//! Webhook payload shapes. Fields the backend does not act on are ignored,
//! and ids arrive as either strings or numbers.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::profile::lenient;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LemonCustomData {
    #[serde(deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tier: String,
    #[serde(deserialize_with = "lenient::string")]
    pub billing_cycle: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LemonMeta {
    #[serde(deserialize_with = "lenient::string")]
    pub event_name: String,
    pub custom_data: Option<LemonCustomData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LemonSubscriptionAttributes {
    #[serde(deserialize_with = "lenient::string")]
    pub customer_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub variant_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub user_email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LemonData {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    pub attributes: LemonSubscriptionAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LemonWebhook {
    pub meta: LemonMeta,
    pub data: LemonData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LemonEventKind {
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionCancelled,
    SubscriptionExpired,
    PaymentSuccess,
    PaymentFailed,
    Other,
}

impl LemonEventKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "subscription_created" => LemonEventKind::SubscriptionCreated,
            "subscription_updated" => LemonEventKind::SubscriptionUpdated,
            "subscription_cancelled" => LemonEventKind::SubscriptionCancelled,
            "subscription_expired" => LemonEventKind::SubscriptionExpired,
            "subscription_payment_success" => LemonEventKind::PaymentSuccess,
            "subscription_payment_failed" => LemonEventKind::PaymentFailed,
            _ => LemonEventKind::Other,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StripeEventData {
    pub object: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: StripeEventData,
}
