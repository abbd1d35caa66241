use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::domain::auth::service::ResendOutcome;
use crate::domain::auth::{
    AuthService, AuthServiceApi, LoginRequest, MessageResponse, RegisterRequest,
    RegisterResponse, ResendVerificationRequest, UserResponse, VerifyEmailResponse,
};
use crate::{
    error::{AppError, AppResult},
    infrastructure::auth::{with_session_cookie, without_session_cookie, AuthUser},
};

pub struct AuthController {
    auth_service: Arc<AuthService>,
    session_hours: i64,
    secure_cookies: bool,
}

impl AuthController {
    pub fn new(auth_service: Arc<AuthService>, session_hours: i64, secure_cookies: bool) -> Self {
        Self {
            auth_service,
            session_hours,
            secure_cookies,
        }
    }

    fn set_session(&self, jar: CookieJar, token: String) -> CookieJar {
        with_session_cookie(jar, token, self.session_hours, self.secure_cookies)
    }

    /// POST /api/auth/register - Create an account and start a session
    pub async fn register(
        State(controller): State<Arc<AuthController>>,
        jar: CookieJar,
        Json(request): Json<RegisterRequest>,
    ) -> AppResult<(StatusCode, CookieJar, Json<RegisterResponse>)> {
        let session = controller.auth_service.register(request).await?;
        let jar = controller.set_session(jar, session.token);

        Ok((
            StatusCode::CREATED,
            jar,
            Json(RegisterResponse {
                user: session.user,
                message: "Please check your email to verify your account".to_string(),
            }),
        ))
    }

    /// POST /api/auth/login
    pub async fn login(
        State(controller): State<Arc<AuthController>>,
        jar: CookieJar,
        Json(request): Json<LoginRequest>,
    ) -> AppResult<(CookieJar, Json<UserResponse>)> {
        let session = controller.auth_service.login(request).await?;
        let jar = controller.set_session(jar, session.token);

        Ok((jar, Json(UserResponse { user: session.user })))
    }

    /// POST /api/auth/logout - Clear the session cookie
    pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
        (
            without_session_cookie(jar),
            Json(MessageResponse {
                message: "Logged out".to_string(),
            }),
        )
    }

    /// GET /api/auth/me
    pub async fn me(
        State(controller): State<Arc<AuthController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UserResponse>> {
        let user = controller.auth_service.me(auth_user.user_id).await?;
        Ok(Json(UserResponse { user }))
    }

    /// GET /api/auth/verify-email/:token - Verify and sign in
    pub async fn verify_email(
        State(controller): State<Arc<AuthController>>,
        jar: CookieJar,
        Path(token): Path<String>,
    ) -> AppResult<(CookieJar, Json<VerifyEmailResponse>)> {
        let session = controller.auth_service.verify_email(&token).await?;
        let jar = controller.set_session(jar, session.token);

        Ok((
            jar,
            Json(VerifyEmailResponse {
                success: true,
                message: "Email verified successfully".to_string(),
            }),
        ))
    }

    /// POST /api/auth/resend-verification
    pub async fn resend_verification(
        State(controller): State<Arc<AuthController>>,
        Json(request): Json<ResendVerificationRequest>,
    ) -> AppResult<Json<MessageResponse>> {
        let email = request
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;

        let message = match controller.auth_service.resend_verification(&email).await? {
            ResendOutcome::Sent => "Verification email sent",
            ResendOutcome::UnknownEmail => {
                "If the email exists, a verification link has been sent"
            }
        };

        Ok(Json(MessageResponse {
            message: message.to_string(),
        }))
    }
}
