use super::error::BillingServiceError;
use super::events::{LemonEventKind, LemonWebhook};
use super::plans::{plan_name, tier_for_variant};
use super::signature::verify_lemon_signature;
use super::LemonCheckoutRequest;
use crate::domain::user::{SubscriptionTier, User};
use crate::infrastructure::clients::{EmailSender, LemonCheckout, LemonSqueezyClient};
use crate::infrastructure::config::LemonSqueezyConfig;
use crate::infrastructure::repositories::{UsageRepository, UserRepository};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct LemonSqueezyService {
    user_repo: Arc<UserRepository>,
    usage_repo: Arc<UsageRepository>,
    client: Arc<LemonSqueezyClient>,
    email_sender: Arc<dyn EmailSender>,
    config: LemonSqueezyConfig,
    frontend_url: String,
}

impl LemonSqueezyService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        usage_repo: Arc<UsageRepository>,
        client: Arc<LemonSqueezyClient>,
        email_sender: Arc<dyn EmailSender>,
        config: LemonSqueezyConfig,
        frontend_url: String,
    ) -> Self {
        Self {
            user_repo,
            usage_repo,
            client,
            email_sender,
            config,
            frontend_url,
        }
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, BillingServiceError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| BillingServiceError::Dependency(e.to_string()))
    }

    async fn apply_subscription(
        &self,
        kind: LemonEventKind,
        user_id: Uuid,
        webhook: &LemonWebhook,
        custom_tier: Option<&str>,
    ) -> Result<(), BillingServiceError> {
        let attributes = &webhook.data.attributes;
        let tier = tier_for_variant(&self.config.variants, &attributes.variant_id)
            .or_else(|| custom_tier.and_then(|t| t.parse::<SubscriptionTier>().ok()));
        let Some(tier) = tier else {
            tracing::warn!(
                user_id = %user_id,
                variant_id = %attributes.variant_id,
                "Subscription event without a resolvable tier"
            );
            return Ok(());
        };

        let applied = self
            .user_repo
            .apply_lemon_subscription(user_id, tier, &attributes.customer_id, &webhook.data.id)
            .await
            .map_err(|e| BillingServiceError::Dependency(e.to_string()))?;
        if !applied {
            tracing::warn!(user_id = %user_id, "Subscription event for unknown user");
            return Ok(());
        }
        tracing::info!(user_id = %user_id, tier = %tier, "Subscription applied");

        if kind == LemonEventKind::SubscriptionCreated {
            if let Some(user) = self.find_user(user_id).await? {
                if let Err(e) = self
                    .email_sender
                    .send_subscription_confirmation(&user.email, plan_name(tier))
                    .await
                {
                    tracing::error!(user_id = %user_id, error = %e, "Failed to send subscription confirmation");
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
pub trait LemonSqueezyServiceApi: Send + Sync {
    async fn create_checkout(
        &self,
        user_id: Uuid,
        request: LemonCheckoutRequest,
    ) -> Result<String, BillingServiceError>;

    async fn customer_portal(&self, user_id: Uuid) -> Result<String, BillingServiceError>;

    /// Verify and apply a webhook delivery. `body` is the raw request body.
    async fn handle_webhook(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<(), BillingServiceError>;
}

#[async_trait]
impl LemonSqueezyServiceApi for LemonSqueezyService {
    async fn create_checkout(
        &self,
        user_id: Uuid,
        request: LemonCheckoutRequest,
    ) -> Result<String, BillingServiceError> {
        if !self.client.is_configured() {
            return Err(BillingServiceError::NotConfigured(
                "Payment provider not configured".to_string(),
            ));
        }
        let store_id = self.config.store_id.as_deref().ok_or_else(|| {
            BillingServiceError::NotConfigured("Payment provider not configured".to_string())
        })?;

        let user = self
            .find_user(user_id)
            .await?
            .ok_or_else(|| BillingServiceError::NotFound("User not found".to_string()))?;

        let plan_key = request.variant_id.unwrap_or_default();
        let Some(variant_id) = self.config.variants.get(&plan_key) else {
            tracing::warn!(plan = %plan_key, "Checkout requested for unknown plan");
            return Err(BillingServiceError::Invalid("Invalid plan selected".to_string()));
        };

        let tier = request.tier.unwrap_or_default();
        let billing_cycle = request.billing_cycle.unwrap_or_default();
        let redirect_url = format!(
            "{}/billing?success=true&tier={}",
            self.frontend_url,
            urlencoding::encode(&tier)
        );
        let user_id_text = user.id.to_string();

        let url = self
            .client
            .create_checkout(LemonCheckout {
                store_id,
                variant_id,
                email: &user.email,
                user_id: &user_id_text,
                tier: &tier,
                billing_cycle: &billing_cycle,
                redirect_url: &redirect_url,
            })
            .await?;

        tracing::info!(user_id = %user_id, plan = %plan_key, "LemonSqueezy checkout created");
        Ok(url)
    }

    async fn customer_portal(&self, user_id: Uuid) -> Result<String, BillingServiceError> {
        let customer_id = self
            .find_user(user_id)
            .await?
            .and_then(|u| u.lemon_customer_id)
            .ok_or_else(|| BillingServiceError::NotFound("No subscription found".to_string()))?;

        Ok(self.client.customer_portal_url(&customer_id).await?)
    }

    async fn handle_webhook(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<(), BillingServiceError> {
        let secret = self.config.webhook_secret.as_deref().ok_or_else(|| {
            BillingServiceError::NotConfigured("Webhook not configured".to_string())
        })?;

        let signature = signature.unwrap_or_default();
        if !verify_lemon_signature(secret, body, signature) {
            tracing::warn!("Rejected LemonSqueezy webhook with invalid signature");
            return Err(BillingServiceError::InvalidSignature);
        }

        let webhook: LemonWebhook = serde_json::from_slice(body)
            .map_err(|e| BillingServiceError::Invalid(format!("malformed webhook payload: {}", e)))?;
        let kind = LemonEventKind::parse(&webhook.meta.event_name);
        let custom = webhook.meta.custom_data.as_ref();
        let user_id = custom.and_then(|c| Uuid::parse_str(c.user_id.trim()).ok());
        let custom_tier = custom.map(|c| c.tier.as_str()).filter(|t| !t.is_empty());

        tracing::info!(
            event = %webhook.meta.event_name,
            user_id = ?user_id,
            "LemonSqueezy webhook received"
        );

        let Some(user_id) = user_id else {
            if kind != LemonEventKind::Other {
                tracing::warn!(event = %webhook.meta.event_name, "Webhook without a valid user id");
            }
            return Ok(());
        };

        match kind {
            LemonEventKind::SubscriptionCreated | LemonEventKind::SubscriptionUpdated => {
                self.apply_subscription(kind, user_id, &webhook, custom_tier)
                    .await?;
            }
            LemonEventKind::SubscriptionCancelled | LemonEventKind::SubscriptionExpired => {
                let cancelled = self
                    .user_repo
                    .cancel_lemon_subscription(user_id)
                    .await
                    .map_err(|e| BillingServiceError::Dependency(e.to_string()))?;
                tracing::info!(user_id = %user_id, applied = cancelled, "Subscription cancelled");
            }
            LemonEventKind::PaymentSuccess => {
                let reset = self
                    .usage_repo
                    .reset(user_id)
                    .await
                    .map_err(|e| BillingServiceError::Dependency(e.to_string()))?;
                tracing::info!(user_id = %user_id, applied = reset, "Usage reset after payment");
            }
            LemonEventKind::PaymentFailed => {
                tracing::warn!(user_id = %user_id, "Subscription payment failed");
            }
            LemonEventKind::Other => {
                tracing::info!(event = %webhook.meta.event_name, "Unhandled LemonSqueezy event");
            }
        }

        Ok(())
    }
}
