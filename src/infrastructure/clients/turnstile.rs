use serde::Deserialize;

const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Cloudflare Turnstile bot check
pub struct TurnstileVerifier {
    secret: Option<String>,
    verify_url: String,
    http_client: reqwest::Client,
}

impl TurnstileVerifier {
    pub fn new(secret: Option<String>) -> Self {
        Self::with_url(secret, TURNSTILE_VERIFY_URL.to_string())
    }

    pub fn with_url(secret: Option<String>, verify_url: String) -> Self {
        Self {
            secret,
            verify_url,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// True when the token passes, or when no secret is configured.
    /// Transport failures count as a failed check.
    pub async fn verify(&self, token: &str) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            tracing::warn!("Turnstile not configured, skipping verification");
            return true;
        };

        let params = [("secret", secret), ("response", token)];
        let result = self
            .http_client
            .post(&self.verify_url)
            .form(&params)
            .send()
            .await;

        let response = match result {
            Ok(response) => response.json::<SiteVerifyResponse>().await,
            Err(e) => {
                tracing::error!(error = %e, "Turnstile verification request failed");
                return false;
            }
        };

        match response {
            Ok(body) => {
                if !body.success {
                    tracing::warn!(error_codes = ?body.error_codes, "Turnstile verification failed");
                }
                body.success
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse Turnstile response");
                false
            }
        }
    }
}
