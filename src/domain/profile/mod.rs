pub mod lenient;
pub mod model;
pub mod service;

pub use model::*;
pub use service::{ProfileService, ProfileServiceApi};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of PUT /api/profile
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub profile: Option<Value>,
}

/// Response for GET /api/profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Option<Value>,
}

/// Response for PUT /api/profile
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveProfileResponse {
    pub success: bool,
    pub profile: Value,
}
