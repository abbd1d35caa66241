use serde::{Deserialize, Serialize};

use crate::domain::user::PublicUser;

/// Request for POST /api/auth/register
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub turnstile_token: Option<String>,
}

/// Request for POST /api/auth/login
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub turnstile_token: Option<String>,
}

/// Request for POST /api/auth/resend-verification
#[derive(Debug, Serialize, Deserialize)]
pub struct ResendVerificationRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: PublicUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: PublicUser,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyEmailResponse {
    pub success: bool,
    pub message: String,
}

/// A user together with a freshly issued session token
#[derive(Debug)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}
