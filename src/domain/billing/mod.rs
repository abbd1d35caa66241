pub mod error;
pub mod events;
pub mod lemonsqueezy;
pub mod plans;
pub mod signature;
pub mod stripe;

pub use error::BillingServiceError;
pub use lemonsqueezy::{LemonSqueezyService, LemonSqueezyServiceApi};
pub use stripe::{StripeService, StripeServiceApi};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LemonCheckoutRequest {
    /// Plan key such as `LEMON_PRO_MONTHLY`
    pub variant_id: Option<String>,
    pub tier: Option<String>,
    pub billing_cycle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StripeCheckoutRequest {
    pub price_id: Option<String>,
    pub tier: Option<String>,
}

/// Redirect target for checkout and portal endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}
