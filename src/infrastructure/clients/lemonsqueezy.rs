use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::infrastructure::config::LemonSqueezyConfig;

const JSON_API: &str = "application/vnd.api+json";

pub struct LemonCheckout<'a> {
    pub store_id: &'a str,
    pub variant_id: &'a str,
    pub email: &'a str,
    pub user_id: &'a str,
    pub tier: &'a str,
    pub billing_cycle: &'a str,
    pub redirect_url: &'a str,
}

/// LemonSqueezy JSON:API client
pub struct LemonSqueezyClient {
    api_key: Option<String>,
    api_url: String,
    http_client: reqwest::Client,
}

impl LemonSqueezyClient {
    pub fn new(config: &LemonSqueezyConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Internal("Payment provider not configured".to_string()))
    }

    async fn read_json(response: reqwest::Response, context: &str) -> AppResult<Value> {
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("{}: {}", context, e)))?;
        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "LemonSqueezy request failed");
            return Err(AppError::ExternalService(context.to_string()));
        }
        Ok(body)
    }

    /// Create a hosted checkout and return its URL
    pub async fn create_checkout(&self, checkout: LemonCheckout<'_>) -> AppResult<String> {
        let api_key = self.api_key()?;
        let numeric_variant = checkout.variant_id.parse::<i64>().map_err(|_| {
            AppError::Internal(format!("Variant id {} is not numeric", checkout.variant_id))
        })?;

        let payload = json!({
            "data": {
                "type": "checkouts",
                "attributes": {
                    "custom_price": null,
                    "product_options": {
                        "enabled_variants": [numeric_variant],
                        "redirect_url": checkout.redirect_url
                    },
                    "checkout_data": {
                        "email": checkout.email,
                        "custom": {
                            "user_id": checkout.user_id,
                            "tier": checkout.tier,
                            "billing_cycle": checkout.billing_cycle
                        }
                    }
                },
                "relationships": {
                    "store": { "data": { "type": "stores", "id": checkout.store_id } },
                    "variant": { "data": { "type": "variants", "id": checkout.variant_id } }
                }
            }
        });

        let response = self
            .http_client
            .post(format!("{}/checkouts", self.api_url))
            .bearer_auth(api_key)
            .header(reqwest::header::CONTENT_TYPE, JSON_API)
            .header(reqwest::header::ACCEPT, JSON_API)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to create checkout session: {}", e)))?;

        let body = Self::read_json(response, "Failed to create checkout session").await?;
        body["data"]["attributes"]["url"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::ExternalService("Checkout response had no URL".to_string()))
    }

    pub async fn customer_portal_url(&self, customer_id: &str) -> AppResult<String> {
        let api_key = self.api_key()?;

        let response = self
            .http_client
            .get(format!(
                "{}/customers/{}",
                self.api_url,
                urlencoding::encode(customer_id)
            ))
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, JSON_API)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to get customer data: {}", e)))?;

        let body = Self::read_json(response, "Failed to get customer data").await?;
        body["data"]["attributes"]["urls"]["customer_portal"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::ExternalService("Customer has no portal URL".to_string()))
    }
}
