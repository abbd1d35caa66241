use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email not verified")]
    EmailNotVerified,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for AuthServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => AuthServiceError::Invalid(msg),
            AppError::Conflict(msg) => AuthServiceError::Conflict(msg),
            AppError::EmailNotVerified => AuthServiceError::EmailNotVerified,
            AppError::NotFound(_) => AuthServiceError::NotFound,
            _ => AuthServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Invalid(msg) => AppError::BadRequest(msg),
            AuthServiceError::Conflict(msg) => AppError::Conflict(msg),
            AuthServiceError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            AuthServiceError::EmailNotVerified => AppError::EmailNotVerified,
            AuthServiceError::NotFound => AppError::NotFound("User not found".to_string()),
            AuthServiceError::Dependency(msg) => AppError::Internal(msg),
            AuthServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
