use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::domain::profile::{
    ProfileResponse, ProfileService, ProfileServiceApi, SaveProfileResponse, UpdateProfileRequest,
};
use crate::{
    error::{AppError, AppResult},
    infrastructure::auth::AuthUser,
};

pub struct ProfileController {
    profile_service: Arc<ProfileService>,
}

impl ProfileController {
    pub fn new(profile_service: Arc<ProfileService>) -> Self {
        Self { profile_service }
    }

    /// GET /api/profile - Master profile, or null before the first save
    pub async fn get_profile(
        State(controller): State<Arc<ProfileController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<ProfileResponse>> {
        let profile = controller
            .profile_service
            .get_profile(auth_user.user_id)
            .await?;
        Ok(Json(ProfileResponse { profile }))
    }

    /// PUT /api/profile - Replace the master profile
    pub async fn update_profile(
        State(controller): State<Arc<ProfileController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<UpdateProfileRequest>,
    ) -> AppResult<Json<SaveProfileResponse>> {
        let profile = request
            .profile
            .filter(|p| p.is_object())
            .ok_or_else(|| AppError::BadRequest("Profile is required".to_string()))?;

        let profile = controller
            .profile_service
            .save_profile(auth_user.user_id, profile)
            .await?;

        Ok(Json(SaveProfileResponse {
            success: true,
            profile,
        }))
    }
}
