use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::error::BillingServiceError;
use super::events::StripeEvent;
use super::plans::tier_for_price;
use super::signature::{verify_stripe_signature, STRIPE_TOLERANCE_SECS};
use super::StripeCheckoutRequest;
use crate::domain::user::User;
use crate::infrastructure::clients::{StripeCheckout, StripeClient, StripeSubscription};
use crate::infrastructure::config::StripeConfig;
use crate::infrastructure::repositories::{UsageRepository, UserRepository};
use async_trait::async_trait;

pub struct StripeService {
    user_repo: Arc<UserRepository>,
    usage_repo: Arc<UsageRepository>,
    client: Arc<StripeClient>,
    config: StripeConfig,
    frontend_url: String,
}

impl StripeService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        usage_repo: Arc<UsageRepository>,
        client: Arc<StripeClient>,
        config: StripeConfig,
        frontend_url: String,
    ) -> Self {
        Self {
            user_repo,
            usage_repo,
            client,
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

    /// Metadata user id first, then the stored customer id
    async fn resolve_user(
        &self,
        metadata_user: Option<&str>,
        customer: Option<&str>,
    ) -> Result<Option<Uuid>, BillingServiceError> {
        if let Some(id) = metadata_user.and_then(|id| Uuid::parse_str(id).ok()) {
            return Ok(Some(id));
        }
        let Some(customer) = customer else {
            return Ok(None);
        };
        let user = self
            .user_repo
            .find_by_stripe_customer(customer)
            .await
            .map_err(|e| BillingServiceError::Dependency(e.to_string()))?;
        Ok(user.map(|u| u.id))
    }

    async fn apply(
        &self,
        user_id: Uuid,
        subscription: &StripeSubscription,
    ) -> Result<(), BillingServiceError> {
        let tier = tier_for_price(&self.config, subscription.price_id.as_deref());
        let period_end = subscription
            .current_period_end
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
        let subscription_id = Some(subscription.id.as_str()).filter(|id| !id.is_empty());

        let applied = self
            .user_repo
            .apply_stripe_subscription(user_id, tier, subscription_id, period_end)
            .await
            .map_err(|e| BillingServiceError::Dependency(e.to_string()))?;
        if applied {
            tracing::info!(user_id = %user_id, tier = %tier, "Stripe subscription applied");
        } else {
            tracing::warn!(user_id = %user_id, "Stripe subscription for unknown user");
        }
        Ok(())
    }

    async fn on_checkout_completed(&self, session: &Value) -> Result<(), BillingServiceError> {
        let user_id = self
            .resolve_user(
                session["metadata"]["userId"].as_str(),
                session["customer"].as_str(),
            )
            .await?;
        let Some(user_id) = user_id else {
            tracing::warn!("Checkout completed without a known user");
            return Ok(());
        };
        let Some(subscription_id) = session["subscription"].as_str() else {
            tracing::warn!(user_id = %user_id, "Checkout completed without a subscription");
            return Ok(());
        };

        let subscription = self.client.retrieve_subscription(subscription_id).await?;
        self.apply(user_id, &subscription).await
    }

    async fn on_subscription_changed(&self, object: &Value) -> Result<(), BillingServiceError> {
        let subscription = StripeSubscription::from_value(object);
        let user_id = self
            .resolve_user(
                subscription.user_id.as_deref(),
                subscription.customer.as_deref(),
            )
            .await?;
        match user_id {
            Some(user_id) => self.apply(user_id, &subscription).await,
            None => {
                tracing::warn!(subscription_id = %subscription.id, "Subscription for unknown user");
                Ok(())
            }
        }
    }

    async fn on_subscription_deleted(&self, object: &Value) -> Result<(), BillingServiceError> {
        let subscription = StripeSubscription::from_value(object);
        let user_id = self
            .resolve_user(
                subscription.user_id.as_deref(),
                subscription.customer.as_deref(),
            )
            .await?;
        if let Some(user_id) = user_id {
            let cancelled = self
                .user_repo
                .cancel_stripe_subscription(user_id)
                .await
                .map_err(|e| BillingServiceError::Dependency(e.to_string()))?;
            tracing::info!(user_id = %user_id, applied = cancelled, "Stripe subscription cancelled");
        }
        Ok(())
    }

    async fn on_payment_succeeded(&self, invoice: &Value) -> Result<(), BillingServiceError> {
        let user_id = self
            .resolve_user(None, invoice["customer"].as_str())
            .await?;
        if let Some(user_id) = user_id {
            let reset = self
                .usage_repo
                .reset(user_id)
                .await
                .map_err(|e| BillingServiceError::Dependency(e.to_string()))?;
            tracing::info!(user_id = %user_id, applied = reset, "Usage reset after invoice payment");
        }
        Ok(())
    }
}

#[async_trait]
pub trait StripeServiceApi: Send + Sync {
    async fn create_checkout(
        &self,
        user_id: Uuid,
        request: StripeCheckoutRequest,
    ) -> Result<String, BillingServiceError>;

    async fn create_portal(&self, user_id: Uuid) -> Result<String, BillingServiceError>;

    async fn handle_webhook(
        &self,
        body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<(), BillingServiceError>;
}

#[async_trait]
impl StripeServiceApi for StripeService {
    async fn create_checkout(
        &self,
        user_id: Uuid,
        request: StripeCheckoutRequest,
    ) -> Result<String, BillingServiceError> {
        if !self.client.is_configured() {
            return Err(BillingServiceError::NotConfigured(
                "Payment provider not configured".to_string(),
            ));
        }
        let price_id = request
            .price_id
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| BillingServiceError::Invalid("Price ID is required".to_string()))?;

        let user = self
            .find_user(user_id)
            .await?
            .ok_or_else(|| BillingServiceError::NotFound("User not found".to_string()))?;
        let user_id_text = user.id.to_string();

        let customer_id = match user.stripe_customer_id {
            Some(id) => id,
            None => {
                let id = self.client.create_customer(&user.email, &user_id_text).await?;
                self.user_repo
                    .set_stripe_customer(user.id, &id)
                    .await
                    .map_err(|e| BillingServiceError::Dependency(e.to_string()))?;
                tracing::info!(user_id = %user.id, customer_id = %id, "Stripe customer created");
                id
            }
        };

        let tier = request
            .tier
            .unwrap_or_else(|| tier_for_price(&self.config, Some(&price_id)).to_string());
        let success_url = format!(
            "{}/billing?success=true&tier={}",
            self.frontend_url,
            urlencoding::encode(&tier)
        );
        let cancel_url = format!("{}/billing?canceled=true", self.frontend_url);

        let url = self
            .client
            .create_checkout_session(StripeCheckout {
                customer_id: &customer_id,
                price_id: &price_id,
                user_id: &user_id_text,
                tier: &tier,
                success_url: &success_url,
                cancel_url: &cancel_url,
            })
            .await?;

        tracing::info!(user_id = %user_id, price_id = %price_id, "Stripe checkout created");
        Ok(url)
    }

    async fn create_portal(&self, user_id: Uuid) -> Result<String, BillingServiceError> {
        let customer_id = self
            .find_user(user_id)
            .await?
            .and_then(|u| u.stripe_customer_id)
            .ok_or_else(|| {
                BillingServiceError::Invalid(
                    "No billing account found. Please subscribe to a plan first.".to_string(),
                )
            })?;

        let return_url = format!("{}/billing", self.frontend_url);
        Ok(self
            .client
            .create_portal_session(&customer_id, &return_url)
            .await?)
    }

    async fn handle_webhook(
        &self,
        body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<(), BillingServiceError> {
        let secret = self.config.webhook_secret.as_deref().ok_or_else(|| {
            BillingServiceError::NotConfigured("Webhook not configured".to_string())
        })?;
        let header = signature_header.ok_or_else(|| {
            BillingServiceError::WebhookRejected("missing stripe-signature header".to_string())
        })?;

        verify_stripe_signature(secret, body, header, Utc::now().timestamp(), STRIPE_TOLERANCE_SECS)
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected Stripe webhook");
                BillingServiceError::WebhookRejected(e.to_string())
            })?;

        let event: StripeEvent = serde_json::from_slice(body)
            .map_err(|e| BillingServiceError::WebhookRejected(e.to_string()))?;
        tracing::info!(event_id = %event.id, event = %event.kind, "Stripe webhook received");

        let object = &event.data.object;
        match event.kind.as_str() {
            "checkout.session.completed" => self.on_checkout_completed(object).await,
            "customer.subscription.created" | "customer.subscription.updated" => {
                self.on_subscription_changed(object).await
            }
            "customer.subscription.deleted" => self.on_subscription_deleted(object).await,
            "invoice.payment_succeeded" => self.on_payment_succeeded(object).await,
            "invoice.payment_failed" => {
                tracing::warn!(customer = ?object["customer"].as_str(), "Invoice payment failed");
                Ok(())
            }
            other => {
                tracing::debug!(event = %other, "Unhandled Stripe event");
                Ok(())
            }
        }
    }
}
