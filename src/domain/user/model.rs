use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub auth_provider: String,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub verification_expires: Option<DateTime<Utc>>,
    pub subscription_tier: SubscriptionTier,
    pub usage_count: i32,
    pub last_reset_date: DateTime<Utc>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub lemon_customer_id: Option<String>,
    pub lemon_subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionTier {
    Free,
    Starter,
    Pro,
    Unlimited,
}

impl SubscriptionTier {
    /// Generations allowed per calendar month
    pub fn monthly_limit(&self) -> i32 {
        match self {
            SubscriptionTier::Free => 0,
            SubscriptionTier::Starter => 20,
            SubscriptionTier::Pro => 70,
            // soft cap
            SubscriptionTier::Unlimited => 1000,
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionTier::Free => write!(f, "FREE"),
            SubscriptionTier::Starter => write!(f, "STARTER"),
            SubscriptionTier::Pro => write!(f, "PRO"),
            SubscriptionTier::Unlimited => write!(f, "UNLIMITED"),
        }
    }
}

impl std::str::FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FREE" => Ok(SubscriptionTier::Free),
            "STARTER" => Ok(SubscriptionTier::Starter),
            "PRO" => Ok(SubscriptionTier::Pro),
            "UNLIMITED" => Ok(SubscriptionTier::Unlimited),
            other => Err(format!("Unknown subscription tier: {}", other)),
        }
    }
}

/// User as returned to clients: no password hash, no verification token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub auth_provider: String,
    pub email_verified: bool,
    pub subscription_tier: SubscriptionTier,
    pub usage_count: i32,
    pub last_reset_date: DateTime<Utc>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            auth_provider: user.auth_provider,
            email_verified: user.email_verified,
            subscription_tier: user.subscription_tier,
            usage_count: user.usage_count,
            last_reset_date: user.last_reset_date,
            subscription_end_date: user.subscription_end_date,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
