use super::error::ApplicationServiceError;
use super::{
    ApplicationResponse, ApplicationStatus, CreateApplicationRequest, CreatedApplication,
};
use crate::domain::tailoring::sanitizer::sanitize_match_score;
use crate::infrastructure::repositories::{ApplicationRepository, NewApplication};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub struct ApplicationService {
    application_repo: Arc<ApplicationRepository>,
}

impl ApplicationService {
    pub fn new(application_repo: Arc<ApplicationRepository>) -> Self {
        Self { application_repo }
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[async_trait]
pub trait ApplicationServiceApi: Send + Sync {
    async fn list(&self, user_id: Uuid) -> Result<Vec<ApplicationResponse>, ApplicationServiceError>;

    async fn create(
        &self,
        user_id: Uuid,
        request: CreateApplicationRequest,
    ) -> Result<CreatedApplication, ApplicationServiceError>;

    async fn update_status(
        &self,
        user_id: Uuid,
        application_id: Uuid,
        status: &str,
    ) -> Result<(), ApplicationServiceError>;

    async fn delete(&self, user_id: Uuid, application_id: Uuid)
        -> Result<(), ApplicationServiceError>;
}

#[async_trait]
impl ApplicationServiceApi for ApplicationService {
    async fn list(&self, user_id: Uuid) -> Result<Vec<ApplicationResponse>, ApplicationServiceError> {
        let records = self
            .application_repo
            .list_by_user(user_id)
            .await
            .map_err(|e| ApplicationServiceError::Dependency(e.to_string()))?;
        Ok(records.into_iter().map(ApplicationResponse::from).collect())
    }

    async fn create(
        &self,
        user_id: Uuid,
        request: CreateApplicationRequest,
    ) -> Result<CreatedApplication, ApplicationServiceError> {
        let (job_title, company) =
            match (required(request.job_title), required(request.company_name)) {
                (Some(title), Some(company)) => (title, company),
                _ => {
                    return Err(ApplicationServiceError::Invalid(
                        "Job title and company name are required".to_string(),
                    ))
                }
            };

        let tailored_resume = request
            .tailored_profile
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| Value::Object(Default::default()));
        let match_score = request
            .match_score
            .as_ref()
            .map(sanitize_match_score)
            .unwrap_or(0);
        let description = request.job_description.unwrap_or_default();

        let record = self
            .application_repo
            .create(NewApplication {
                user_id,
                job_title: &job_title,
                company: &company,
                original_description: &description,
                tailored_resume: &tailored_resume,
                match_score,
                status: ApplicationStatus::Applied.as_str(),
            })
            .await
            .map_err(|e| ApplicationServiceError::Dependency(e.to_string()))?;

        tracing::info!(user_id = %user_id, application_id = %record.id, "Application created");

        Ok(CreatedApplication {
            id: record.id,
            created_at: record.created_at,
        })
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        application_id: Uuid,
        status: &str,
    ) -> Result<(), ApplicationServiceError> {
        let status: ApplicationStatus = status.parse().map_err(ApplicationServiceError::Invalid)?;

        let updated = self
            .application_repo
            .update_status(application_id, user_id, status.as_str())
            .await
            .map_err(|e| ApplicationServiceError::Dependency(e.to_string()))?;
        if !updated {
            return Err(ApplicationServiceError::NotFound);
        }

        tracing::info!(
            user_id = %user_id,
            application_id = %application_id,
            status = %status,
            "Application status updated"
        );
        Ok(())
    }

    async fn delete(
        &self,
        user_id: Uuid,
        application_id: Uuid,
    ) -> Result<(), ApplicationServiceError> {
        let deleted = self
            .application_repo
            .delete(application_id, user_id)
            .await
            .map_err(|e| ApplicationServiceError::Dependency(e.to_string()))?;
        if !deleted {
            return Err(ApplicationServiceError::NotFound);
        }

        tracing::info!(user_id = %user_id, application_id = %application_id, "Application deleted");
        Ok(())
    }
}
