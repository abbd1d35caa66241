use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("application not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for ApplicationServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => ApplicationServiceError::Invalid(msg),
            AppError::NotFound(_) => ApplicationServiceError::NotFound,
            _ => ApplicationServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<ApplicationServiceError> for AppError {
    fn from(err: ApplicationServiceError) -> Self {
        match err {
            ApplicationServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ApplicationServiceError::NotFound => {
                AppError::NotFound("Application not found".to_string())
            }
            ApplicationServiceError::Dependency(msg) => AppError::Internal(msg),
            ApplicationServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
