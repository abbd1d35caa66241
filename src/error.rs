use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::user::SubscriptionTier;

/// Whether internal 500 responses carry the underlying message (development)
/// or a generic one (production). Set once at startup.
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::Relaxed);
}

const UPGRADE_URL: &str = "/settings/billing";

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Missing session or bad credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Session present but rejected, or action not allowed
    #[error("{0}")]
    Forbidden(String),

    #[error("Please verify your email before logging in")]
    EmailNotVerified,

    #[error("Monthly usage limit reached")]
    QuotaExceeded {
        tier: SubscriptionTier,
        limit: i32,
        current: i32,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    /// Upstream provider failure with a user-facing message
    #[error("{0}")]
    ExternalService(String),

    #[error("{0}")]
    Internal(String),
}

/// Error envelope: `{"error": "...", ...optional fields}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::EmailNotVerified | Self::QuotaExceeded { .. } => {
                StatusCode::FORBIDDEN
            }
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::ExternalService(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Convert to the JSON error envelope
    pub fn to_response(&self) -> ErrorResponse {
        let mut details = Map::new();
        match self {
            Self::QuotaExceeded {
                tier,
                limit,
                current,
            } => {
                details.insert("tier".to_string(), Value::String(tier.to_string()));
                details.insert("limit".to_string(), Value::from(*limit));
                details.insert("current".to_string(), Value::from(*current));
                details.insert(
                    "upgradeUrl".to_string(),
                    Value::String(UPGRADE_URL.to_string()),
                );
            }
            Self::EmailNotVerified => {
                details.insert("needsVerification".to_string(), Value::Bool(true));
            }
            _ => {}
        }

        // ExternalService messages are written for end users and always shown
        let masked = matches!(self, Self::Database(_) | Self::Internal(_));
        let error = if masked && !EXPOSE_INTERNAL_ERRORS.load(Ordering::Relaxed) {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        ErrorResponse { error, details }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status.as_u16(), "Request rejected");
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
