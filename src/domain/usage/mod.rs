pub mod error;
pub mod period;
pub mod service;

pub use error::UsageServiceError;
pub use period::{needs_monthly_reset, next_reset_at};
pub use service::{UsageService, UsageServiceApi};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::SubscriptionTier;

/// Response for GET /api/usage
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    pub tier: SubscriptionTier,
    pub limit: i32,
    pub used: i32,
    pub remaining: i32,
    pub resets_at: DateTime<Utc>,
}

/// Response extension set by a guarded handler whose result did not cost a
/// generation (served from cache, or a parse). The quota gate hands the unit back.
#[derive(Debug, Clone, Copy)]
pub struct UsageNotConsumed;
