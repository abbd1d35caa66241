use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::application::{
    ApplicationService, ApplicationServiceApi, ApplicationsResponse, CreateApplicationRequest,
    CreateApplicationResponse, SuccessResponse, UpdateStatusRequest,
};
use crate::{
    error::{AppError, AppResult},
    infrastructure::auth::AuthUser,
};

pub struct ApplicationController {
    application_service: Arc<ApplicationService>,
}

fn parse_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Application not found".to_string()))
}

impl ApplicationController {
    pub fn new(application_service: Arc<ApplicationService>) -> Self {
        Self {
            application_service,
        }
    }

    /// GET /api/cv/applications - Newest first
    pub async fn list(
        State(controller): State<Arc<ApplicationController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<ApplicationsResponse>> {
        let applications = controller
            .application_service
            .list(auth_user.user_id)
            .await?;
        Ok(Json(ApplicationsResponse { applications }))
    }

    /// POST /api/cv/applications
    pub async fn create(
        State(controller): State<Arc<ApplicationController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<CreateApplicationRequest>,
    ) -> AppResult<(StatusCode, Json<CreateApplicationResponse>)> {
        let application = controller
            .application_service
            .create(auth_user.user_id, request)
            .await?;
        Ok((
            StatusCode::CREATED,
            Json(CreateApplicationResponse { application }),
        ))
    }

    /// PATCH /api/cv/applications/:id
    pub async fn update_status(
        State(controller): State<Arc<ApplicationController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(id): Path<String>,
        Json(request): Json<UpdateStatusRequest>,
    ) -> AppResult<Json<SuccessResponse>> {
        let status = request.status.unwrap_or_default();
        controller
            .application_service
            .update_status(auth_user.user_id, parse_id(&id)?, &status)
            .await?;
        Ok(Json(SuccessResponse { success: true }))
    }

    /// DELETE /api/cv/applications/:id
    pub async fn delete(
        State(controller): State<Arc<ApplicationController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(id): Path<String>,
    ) -> AppResult<Json<SuccessResponse>> {
        controller
            .application_service
            .delete(auth_user.user_id, parse_id(&id)?)
            .await?;
        Ok(Json(SuccessResponse { success: true }))
    }
}
