use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum BillingServiceError {
    /// Provider keys or webhook secret missing
    #[error("{0}")]
    NotConfigured(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("{0}")]
    NotFound(String),
    /// LemonSqueezy signature mismatch
    #[error("Invalid signature")]
    InvalidSignature,
    /// Stripe signature or header problem
    #[error("Webhook Error: {0}")]
    WebhookRejected(String),
    #[error("{0}")]
    Provider(String),
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for BillingServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => BillingServiceError::Invalid(msg),
            AppError::NotFound(msg) => BillingServiceError::NotFound(msg),
            AppError::ExternalService(msg) => BillingServiceError::Provider(msg),
            _ => BillingServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<BillingServiceError> for AppError {
    fn from(err: BillingServiceError) -> Self {
        match err {
            BillingServiceError::NotConfigured(msg) => AppError::Internal(msg),
            BillingServiceError::Invalid(msg) => AppError::BadRequest(msg),
            BillingServiceError::NotFound(msg) => AppError::NotFound(msg),
            BillingServiceError::InvalidSignature => {
                AppError::Unauthorized("Invalid signature".to_string())
            }
            BillingServiceError::WebhookRejected(msg) => {
                AppError::BadRequest(format!("Webhook Error: {}", msg))
            }
            BillingServiceError::Provider(msg) => AppError::ExternalService(msg),
            BillingServiceError::Dependency(msg) => AppError::Internal(msg),
            BillingServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
