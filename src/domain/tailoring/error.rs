use crate::error::AppError;
use crate::infrastructure::repositories::CompletionError;

#[derive(Debug, thiserror::Error)]
pub enum TailoringServiceError {
    #[error("AI service not configured")]
    NotConfigured,
    #[error("AI provider quota exceeded")]
    QuotaExceeded,
    #[error("AI provider rejected the API key")]
    InvalidApiKey,
    #[error("{0}")]
    Invalid(String),
    /// The model answered but the answer was unusable
    #[error("{0}")]
    Failed(String),
    /// Failure with a complete user-facing message
    #[error("{0}")]
    Unusable(String),
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<CompletionError> for TailoringServiceError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::QuotaExceeded => TailoringServiceError::QuotaExceeded,
            CompletionError::InvalidApiKey => TailoringServiceError::InvalidApiKey,
            CompletionError::Empty => TailoringServiceError::Failed("No response from AI".to_string()),
            CompletionError::Failed(msg) => TailoringServiceError::Failed(msg),
        }
    }
}

impl From<AppError> for TailoringServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => TailoringServiceError::Invalid(msg),
            _ => TailoringServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<TailoringServiceError> for AppError {
    fn from(err: TailoringServiceError) -> Self {
        match err {
            TailoringServiceError::NotConfigured => AppError::ExternalService(
                "AI service not configured. Please contact support.".to_string(),
            ),
            TailoringServiceError::QuotaExceeded => AppError::ServiceUnavailable(
                "AI service temporarily unavailable. Please try again later.".to_string(),
            ),
            TailoringServiceError::InvalidApiKey => AppError::ExternalService(
                "AI service configuration error. Please contact support.".to_string(),
            ),
            TailoringServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TailoringServiceError::Failed(msg) => {
                AppError::ExternalService(format!("AI analysis failed: {}", msg))
            }
            TailoringServiceError::Unusable(msg) => AppError::ExternalService(msg),
            TailoringServiceError::Dependency(msg) => AppError::Internal(msg),
            TailoringServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
