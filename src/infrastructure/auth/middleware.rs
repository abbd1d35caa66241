use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use super::session::AUTH_COOKIE;
use crate::domain::auth::JwtManager;
use crate::error::AppError;
use uuid::Uuid;

/// User context injected into request extensions after authentication
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Session token from the `auth_token` cookie, else from `Authorization: Bearer`
fn extract_token(request: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(request.headers());
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
pub async fn auth_middleware(
    State(jwt_manager): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let claims = jwt_manager.validate_token(&token)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Forbidden("Invalid or expired token".to_string()))?;

    request.extensions_mut().insert(AuthUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
