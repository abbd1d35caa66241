use serde::Deserialize;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub environment: Environment,
    pub log_format: LogFormat,
    /// Public URL of the web app; used for redirects, email links and CORS
    pub frontend_url: String,
    pub ai: AiConfig,
    pub lemonsqueezy: LemonSqueezyConfig,
    pub stripe: StripeConfig,
    pub email: EmailConfig,
    /// Cloudflare Turnstile secret; bot checks are skipped without it
    pub turnstile_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    Gemini,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_url: String,
}

impl AiConfig {
    /// Key of the selected provider, if configured
    pub fn active_api_key(&self) -> Option<&str> {
        match self.provider {
            AiProvider::OpenAi => self.openai_api_key.as_deref(),
            AiProvider::Gemini => self.gemini_api_key.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LemonSqueezyConfig {
    pub api_key: Option<String>,
    pub store_id: Option<String>,
    pub webhook_secret: Option<String>,
    pub api_url: String,
    /// Plan key (e.g. `LEMON_PRO_MONTHLY`) to store variant id
    pub variants: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub api_url: String,
    pub starter_price_id: Option<String>,
    pub pro_price_id: Option<String>,
    pub unlimited_price_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub resend_api_key: Option<String>,
    pub resend_api_url: String,
    pub from: String,
}

pub const LEMON_PLAN_KEYS: [&str; 6] = [
    "LEMON_STARTER_MONTHLY",
    "LEMON_STARTER_ANNUAL",
    "LEMON_PRO_MONTHLY",
    "LEMON_PRO_ANNUAL",
    "LEMON_UNLIMITED_MONTHLY",
    "LEMON_UNLIMITED_ANNUAL",
];

/// Unset and blank variables both read as absent
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let variants = LEMON_PLAN_KEYS
            .iter()
            .filter_map(|key| optional(key).map(|id| (key.to_string(), id)))
            .collect();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "168".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            ai: AiConfig {
                provider: match env::var("AI_PROVIDER")
                    .unwrap_or_default()
                    .to_lowercase()
                    .as_str()
                {
                    "gemini" => AiProvider::Gemini,
                    _ => AiProvider::OpenAi,
                },
                openai_api_key: optional("OPENAI_API_KEY"),
                openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
                gemini_api_key: optional("GEMINI_API_KEY"),
                gemini_model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
                gemini_api_url: env::var("GEMINI_API_URL").unwrap_or_else(|_| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
            },
            lemonsqueezy: LemonSqueezyConfig {
                api_key: optional("LEMONSQUEEZY_API_KEY"),
                store_id: optional("LEMONSQUEEZY_STORE_ID"),
                webhook_secret: optional("LEMONSQUEEZY_WEBHOOK_SECRET"),
                api_url: env::var("LEMONSQUEEZY_API_URL")
                    .unwrap_or_else(|_| "https://api.lemonsqueezy.com/v1".to_string()),
                variants,
            },
            stripe: StripeConfig {
                secret_key: optional("STRIPE_SECRET_KEY"),
                webhook_secret: optional("STRIPE_WEBHOOK_SECRET"),
                api_url: env::var("STRIPE_API_URL")
                    .unwrap_or_else(|_| "https://api.stripe.com/v1".to_string()),
                starter_price_id: optional("STRIPE_STARTER_PRICE_ID"),
                pro_price_id: optional("STRIPE_PRO_PRICE_ID"),
                unlimited_price_id: optional("STRIPE_UNLIMITED_PRICE_ID"),
            },
            email: EmailConfig {
                resend_api_key: optional("RESEND_API_KEY"),
                resend_api_url: env::var("RESEND_API_URL")
                    .unwrap_or_else(|_| "https://api.resend.com".to_string()),
                from: env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| "noreply@tailoredairesume.com".to_string()),
            },
            turnstile_secret: optional("TURNSTILE_SECRET_KEY"),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}
