pub mod error;
pub mod model;
pub mod service;

pub use error::ApplicationServiceError;
pub use model::ApplicationStatus;
pub use service::{ApplicationService, ApplicationServiceApi};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::repositories::ApplicationRecord;

/// One tracked application as the client sees it
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub date_applied: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Lowercase
    pub status: String,
    pub job_description: String,
    pub tailored_profile: Value,
    pub match_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_questions: Option<Value>,
}

impl From<ApplicationRecord> for ApplicationResponse {
    fn from(record: ApplicationRecord) -> Self {
        Self {
            id: record.id,
            job_title: record.job_title,
            company_name: record.company,
            date_applied: record.created_at,
            last_updated: record.updated_at,
            status: record.status.to_lowercase(),
            job_description: record.original_description,
            tailored_profile: record.tailored_resume,
            match_score: record.match_score,
            cover_letter: record.cover_letter,
            interview_questions: record.interview_questions,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub tailored_profile: Option<Value>,
    pub match_score: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedApplication {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateApplicationResponse {
    pub application: CreatedApplication,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}
