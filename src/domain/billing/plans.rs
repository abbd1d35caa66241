use std::collections::HashMap;

use crate::domain::user::SubscriptionTier;
use crate::infrastructure::config::StripeConfig;

/// Tier encoded in a plan key: `LEMON_PRO_MONTHLY` is PRO
pub fn tier_from_plan_key(key: &str) -> Option<SubscriptionTier> {
    key.split('_').nth(1)?.parse().ok()
}

/// Reverse lookup of a LemonSqueezy variant id through the plan table
pub fn tier_for_variant(variants: &HashMap<String, String>, variant_id: &str) -> Option<SubscriptionTier> {
    if variant_id.is_empty() {
        return None;
    }
    variants
        .iter()
        .find(|(_, id)| id.as_str() == variant_id)
        .and_then(|(key, _)| tier_from_plan_key(key))
}

/// Unknown or missing prices fall back to STARTER
pub fn tier_for_price(config: &StripeConfig, price_id: Option<&str>) -> SubscriptionTier {
    let Some(price_id) = price_id else {
        return SubscriptionTier::Starter;
    };
    let table = [
        (&config.starter_price_id, SubscriptionTier::Starter),
        (&config.pro_price_id, SubscriptionTier::Pro),
        (&config.unlimited_price_id, SubscriptionTier::Unlimited),
    ];
    table
        .into_iter()
        .find(|(id, _)| id.as_deref() == Some(price_id))
        .map(|(_, tier)| tier)
        .unwrap_or(SubscriptionTier::Starter)
}

/// Human name used in emails
pub fn plan_name(tier: SubscriptionTier) -> &'static str {
    match tier {
        SubscriptionTier::Free => "Free",
        SubscriptionTier::Starter => "Starter",
        SubscriptionTier::Pro => "Pro",
        SubscriptionTier::Unlimited => "Unlimited",
    }
}
