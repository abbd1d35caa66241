pub mod dto;
pub mod error;
pub mod jwt;
pub mod password;
pub mod service;

pub use dto::*;
pub use error::AuthServiceError;
pub use jwt::{Claims, JwtManager};
pub use password::{generate_verification_token, hash_password, verify_password};
pub use service::{AuthService, AuthServiceApi};
