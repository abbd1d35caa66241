use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::db::{ping, DbPool};

#[derive(Clone)]
pub struct HealthState {
    pub pool: Arc<DbPool>,
    pub environment: String,
}

pub async fn health(State(state): State<HealthState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.environment,
    }))
}

pub async fn health_ready(State(state): State<HealthState>) -> impl IntoResponse {
    match ping(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected"
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "database": "disconnected"
                })),
            )
        }
    }
}
