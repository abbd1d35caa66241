use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::domain::usage::{UsageResponse, UsageService, UsageServiceApi};
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct UsageController {
    usage_service: Arc<UsageService>,
}

impl UsageController {
    pub fn new(usage_service: Arc<UsageService>) -> Self {
        Self { usage_service }
    }

    /// GET /api/usage - Current month's generations against the tier limit
    pub async fn get_usage(
        State(controller): State<Arc<UsageController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UsageResponse>> {
        let usage = controller.usage_service.get_usage(auth_user.user_id).await?;
        Ok(Json(usage))
    }
}
