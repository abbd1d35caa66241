use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::infrastructure::config::StripeConfig;

/// The parts of a Stripe subscription object the backend reads
#[derive(Debug, Clone, PartialEq)]
pub struct StripeSubscription {
    pub id: String,
    pub customer: Option<String>,
    pub price_id: Option<String>,
    /// Unix seconds
    pub current_period_end: Option<i64>,
    pub user_id: Option<String>,
}

impl StripeSubscription {
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: value["id"].as_str().unwrap_or_default().to_string(),
            customer: value["customer"].as_str().map(str::to_string),
            price_id: value["items"]["data"][0]["price"]["id"]
                .as_str()
                .map(str::to_string),
            current_period_end: value["current_period_end"].as_i64(),
            user_id: value["metadata"]["userId"].as_str().map(str::to_string),
        }
    }
}

pub struct StripeCheckout<'a> {
    pub customer_id: &'a str,
    pub price_id: &'a str,
    pub user_id: &'a str,
    pub tier: &'a str,
    pub success_url: &'a str,
    pub cancel_url: &'a str,
}

/// Stripe REST client using form-encoded requests
pub struct StripeClient {
    secret_key: Option<String>,
    api_url: String,
    http_client: reqwest::Client,
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            secret_key: config.secret_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    async fn send<F: Serialize + ?Sized>(
        &self,
        request: reqwest::RequestBuilder,
        form: Option<&F>,
        context: &str,
    ) -> AppResult<Value> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or_else(|| AppError::Internal("Payment provider not configured".to_string()))?;

        let mut request = request.bearer_auth(secret_key);
        if let Some(form) = form {
            request = request.form(form);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("{}: {}", context, e)))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("{}: {}", context, e)))?;

        if !status.is_success() {
            let message = body["error"]["message"].as_str().unwrap_or("unknown error");
            tracing::error!(status = %status, error = %message, "Stripe request failed");
            return Err(AppError::ExternalService(format!("{}: {}", context, message)));
        }
        Ok(body)
    }

    fn url_of(body: &Value, context: &str) -> AppResult<String> {
        body["url"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::ExternalService(format!("{}: response had no URL", context)))
    }

    /// Returns the new customer id
    pub async fn create_customer(&self, email: &str, user_id: &str) -> AppResult<String> {
        let context = "Failed to create customer";
        let form = [("email", email), ("metadata[userId]", user_id)];
        let body = self
            .send(
                self.http_client.post(format!("{}/customers", self.api_url)),
                Some(&form[..]),
                context,
            )
            .await?;

        body["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::ExternalService(format!("{}: response had no id", context)))
    }

    /// Subscription-mode checkout; returns the hosted page URL
    pub async fn create_checkout_session(&self, checkout: StripeCheckout<'_>) -> AppResult<String> {
        let context = "Failed to create checkout session";
        let form = [
            ("customer", checkout.customer_id),
            ("mode", "subscription"),
            ("payment_method_types[0]", "card"),
            ("line_items[0][price]", checkout.price_id),
            ("line_items[0][quantity]", "1"),
            ("success_url", checkout.success_url),
            ("cancel_url", checkout.cancel_url),
            ("metadata[userId]", checkout.user_id),
            ("metadata[tier]", checkout.tier),
            ("subscription_data[metadata][userId]", checkout.user_id),
        ];
        let body = self
            .send(
                self.http_client
                    .post(format!("{}/checkout/sessions", self.api_url)),
                Some(&form[..]),
                context,
            )
            .await?;

        Self::url_of(&body, context)
    }

    pub async fn create_portal_session(&self, customer_id: &str, return_url: &str) -> AppResult<String> {
        let context = "Failed to create portal session";
        let form = [("customer", customer_id), ("return_url", return_url)];
        let body = self
            .send(
                self.http_client
                    .post(format!("{}/billing_portal/sessions", self.api_url)),
                Some(&form[..]),
                context,
            )
            .await?;

        Self::url_of(&body, context)
    }

    pub async fn retrieve_subscription(&self, subscription_id: &str) -> AppResult<StripeSubscription> {
        let body = self
            .send::<[(&str, &str)]>(
                self.http_client.get(format!(
                    "{}/subscriptions/{}",
                    self.api_url,
                    urlencoding::encode(subscription_id)
                )),
                None,
                "Failed to retrieve subscription",
            )
            .await?;

        Ok(StripeSubscription::from_value(&body))
    }
}
