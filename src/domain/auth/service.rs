use super::error::AuthServiceError;
use super::{
    generate_verification_token, hash_password, verify_password, JwtManager, LoginRequest,
    RegisterRequest, Session,
};
use crate::domain::user::{PublicUser, User};
use crate::infrastructure::clients::{EmailSender, TurnstileVerifier};
use crate::infrastructure::repositories::{NewUser, UserRepository};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

const VERIFICATION_TTL_HOURS: i64 = 24;

/// Outcome of a resend request; unknown addresses are not revealed
#[derive(Debug, PartialEq, Eq)]
pub enum ResendOutcome {
    Sent,
    UnknownEmail,
}

pub struct AuthService {
    user_repo: Arc<UserRepository>,
    jwt_manager: Arc<JwtManager>,
    email_sender: Arc<dyn EmailSender>,
    turnstile: Arc<TurnstileVerifier>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        jwt_manager: Arc<JwtManager>,
        email_sender: Arc<dyn EmailSender>,
        turnstile: Arc<TurnstileVerifier>,
    ) -> Self {
        Self {
            user_repo,
            jwt_manager,
            email_sender,
            turnstile,
        }
    }

    /// Bot check runs only when configured and the client supplied a token
    async fn check_bot(&self, token: Option<&str>) -> Result<(), AuthServiceError> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            if self.turnstile.is_enabled() && !self.turnstile.verify(token).await {
                return Err(AuthServiceError::Invalid(
                    "Bot verification failed. Please try again.".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn issue_session(&self, user: User) -> Result<Session, AuthServiceError> {
        let token = self
            .jwt_manager
            .generate_token(user.id, &user.email, user.subscription_tier)?;
        Ok(Session {
            user: PublicUser::from(user),
            token,
        })
    }
}

#[async_trait]
pub trait AuthServiceApi: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<Session, AuthServiceError>;

    async fn login(&self, request: LoginRequest) -> Result<Session, AuthServiceError>;

    async fn me(&self, user_id: Uuid) -> Result<PublicUser, AuthServiceError>;

    async fn verify_email(&self, token: &str) -> Result<Session, AuthServiceError>;

    async fn resend_verification(&self, email: &str) -> Result<ResendOutcome, AuthServiceError>;
}

#[async_trait]
impl AuthServiceApi for AuthService {
    async fn register(&self, request: RegisterRequest) -> Result<Session, AuthServiceError> {
        let email = request.email.as_deref().map(str::trim).unwrap_or_default();
        let password = request.password.as_deref().unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(AuthServiceError::Invalid(
                "Email and password required".to_string(),
            ));
        }

        self.check_bot(request.turnstile_token.as_deref()).await?;

        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AuthServiceError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(password)?;
        let verification_token = generate_verification_token();
        let full_name = request
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let user = self
            .user_repo
            .create(NewUser {
                email,
                password_hash: &password_hash,
                full_name,
                verification_token: &verification_token,
                verification_expires: Utc::now() + Duration::hours(VERIFICATION_TTL_HOURS),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        // The account exists either way; a failed send can be retried via resend
        if let Err(e) = self
            .email_sender
            .send_verification(&user.email, &verification_token, full_name)
            .await
        {
            tracing::error!(user_id = %user.id, error = %e, "Failed to send verification email");
        }

        self.issue_session(user)
    }

    async fn login(&self, request: LoginRequest) -> Result<Session, AuthServiceError> {
        self.check_bot(request.turnstile_token.as_deref()).await?;

        let email = request.email.as_deref().map(str::trim).unwrap_or_default();
        let password = request.password.as_deref().unwrap_or_default();

        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(password, stored_hash) {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        if !user.email_verified {
            return Err(AuthServiceError::EmailNotVerified);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue_session(user)
    }

    async fn me(&self, user_id: Uuid) -> Result<PublicUser, AuthServiceError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(PublicUser::from)
            .ok_or(AuthServiceError::NotFound)
    }

    async fn verify_email(&self, token: &str) -> Result<Session, AuthServiceError> {
        let invalid =
            || AuthServiceError::Invalid("Invalid or expired verification link".to_string());

        if token.trim().is_empty() {
            return Err(invalid());
        }

        let mut user = self
            .user_repo
            .find_by_verification_token(token, Utc::now())
            .await?
            .ok_or_else(invalid)?;

        self.user_repo.mark_verified(user.id).await?;
        user.email_verified = true;
        user.verification_token = None;
        user.verification_expires = None;

        tracing::info!(user_id = %user.id, "Email verified");

        let name = user.full_name.clone().unwrap_or_else(|| "there".to_string());
        if let Err(e) = self.email_sender.send_welcome(&user.email, &name).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send welcome email");
        }

        self.issue_session(user)
    }

    async fn resend_verification(&self, email: &str) -> Result<ResendOutcome, AuthServiceError> {
        let Some(user) = self.user_repo.find_by_email(email.trim()).await? else {
            return Ok(ResendOutcome::UnknownEmail);
        };

        if user.email_verified {
            return Err(AuthServiceError::Invalid("Email already verified".to_string()));
        }

        let token = generate_verification_token();
        self.user_repo
            .set_verification_token(
                user.id,
                &token,
                Utc::now() + Duration::hours(VERIFICATION_TTL_HOURS),
            )
            .await?;

        self.email_sender
            .send_verification(&user.email, &token, user.full_name.as_deref())
            .await?;

        tracing::info!(user_id = %user.id, "Verification email re-sent");
        Ok(ResendOutcome::Sent)
    }
}
