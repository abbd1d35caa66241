use crate::domain::user::SubscriptionTier;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum UsageServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("user not found")]
    NotFound,
    #[error("monthly usage limit reached")]
    LimitReached {
        tier: SubscriptionTier,
        limit: i32,
        current: i32,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for UsageServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => UsageServiceError::NotFound,
            AppError::QuotaExceeded {
                tier,
                limit,
                current,
            } => UsageServiceError::LimitReached {
                tier,
                limit,
                current,
            },
            _ => UsageServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<UsageServiceError> for AppError {
    fn from(err: UsageServiceError) -> Self {
        match err {
            UsageServiceError::NotFound => AppError::NotFound("User not found".to_string()),
            UsageServiceError::LimitReached {
                tier,
                limit,
                current,
            } => AppError::QuotaExceeded {
                tier,
                limit,
                current,
            },
            UsageServiceError::Dependency(msg) => AppError::Internal(msg),
            UsageServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
