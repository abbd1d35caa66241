use super::prompt::{
    build_cover_letter_prompt, build_interview_prompt, extract_questions, COACHING_TEMPERATURE,
    COVER_LETTER_MAX_TOKENS, COVER_LETTER_SYSTEM_PROMPT, INTERVIEW_MAX_TOKENS,
    INTERVIEW_SYSTEM_PROMPT,
};
use super::{Coached, CoverLetterOptions, InterviewQuestion};
use crate::domain::profile::lenient::items_from_value;
use crate::domain::profile::CvProfile;
use crate::domain::tailoring::TailoringServiceError;
use crate::infrastructure::repositories::{
    ApplicationRecord, ApplicationRepository, CompletionRepository, CompletionRequest,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Cover letters and interview questions, cached per application
pub struct CoachingService {
    completion: Option<Arc<dyn CompletionRepository>>,
    application_repo: Arc<ApplicationRepository>,
}

impl CoachingService {
    pub fn new(
        completion: Option<Arc<dyn CompletionRepository>>,
        application_repo: Arc<ApplicationRepository>,
    ) -> Self {
        Self {
            completion,
            application_repo,
        }
    }

    fn provider(&self) -> Result<&Arc<dyn CompletionRepository>, TailoringServiceError> {
        self.completion
            .as_ref()
            .ok_or(TailoringServiceError::NotConfigured)
    }

    async fn owned_application(
        &self,
        user_id: Uuid,
        application_id: Option<Uuid>,
    ) -> Result<Option<ApplicationRecord>, TailoringServiceError> {
        let Some(application_id) = application_id else {
            return Ok(None);
        };
        self.application_repo
            .find_owned(application_id, user_id)
            .await
            .map_err(|e| TailoringServiceError::Dependency(e.to_string()))
    }
}

#[async_trait]
pub trait CoachingServiceApi: Send + Sync {
    /// Profile and job description presence is checked by the caller
    async fn cover_letter(
        &self,
        user_id: Uuid,
        profile: &CvProfile,
        job_description: &str,
        options: &CoverLetterOptions,
        application_id: Option<Uuid>,
    ) -> Result<Coached<String>, TailoringServiceError>;

    /// The cache is consulted before the job description is required
    async fn interview_questions(
        &self,
        user_id: Uuid,
        profile: Option<&CvProfile>,
        job_description: Option<&str>,
        question_type: Option<&str>,
        application_id: Option<Uuid>,
    ) -> Result<Coached<Vec<InterviewQuestion>>, TailoringServiceError>;
}

#[async_trait]
impl CoachingServiceApi for CoachingService {
    async fn cover_letter(
        &self,
        user_id: Uuid,
        profile: &CvProfile,
        job_description: &str,
        options: &CoverLetterOptions,
        application_id: Option<Uuid>,
    ) -> Result<Coached<String>, TailoringServiceError> {
        let application = self.owned_application(user_id, application_id).await?;
        if let Some(cached) = application
            .as_ref()
            .and_then(|a| a.cover_letter.clone())
            .filter(|c| !c.is_empty())
        {
            tracing::debug!(user_id = %user_id, "Serving cached cover letter");
            return Ok(Coached::cached(cached));
        }

        let request = CompletionRequest {
            system: COVER_LETTER_SYSTEM_PROMPT.to_string(),
            user: build_cover_letter_prompt(profile, job_description, options),
            temperature: COACHING_TEMPERATURE,
            max_tokens: COVER_LETTER_MAX_TOKENS,
            json_mode: false,
        };
        let content = self.provider()?.complete(request).await?;
        let letter = content.trim().to_string();
        if letter.is_empty() {
            return Err(TailoringServiceError::Unusable(
                "No cover letter generated".to_string(),
            ));
        }

        if let Some(application) = application {
            self.application_repo
                .save_cover_letter(application.id, user_id, &letter)
                .await
                .map_err(|e| TailoringServiceError::Dependency(e.to_string()))?;
        }

        tracing::info!(user_id = %user_id, "Cover letter generated");
        Ok(Coached::generated(letter))
    }

    async fn interview_questions(
        &self,
        user_id: Uuid,
        profile: Option<&CvProfile>,
        job_description: Option<&str>,
        question_type: Option<&str>,
        application_id: Option<Uuid>,
    ) -> Result<Coached<Vec<InterviewQuestion>>, TailoringServiceError> {
        let application = self.owned_application(user_id, application_id).await?;
        if let Some(cached) = application.as_ref().and_then(|a| a.interview_questions.as_ref()) {
            let questions: Vec<InterviewQuestion> = items_from_value(cached);
            if !questions.is_empty() {
                tracing::debug!(user_id = %user_id, "Serving cached interview questions");
                return Ok(Coached::cached(questions));
            }
        }

        let job_description = job_description
            .filter(|jd| !jd.trim().is_empty())
            .ok_or_else(|| TailoringServiceError::Invalid("Job description is required".to_string()))?;

        let request = CompletionRequest {
            system: INTERVIEW_SYSTEM_PROMPT.to_string(),
            user: build_interview_prompt(profile, job_description, question_type),
            temperature: COACHING_TEMPERATURE,
            max_tokens: INTERVIEW_MAX_TOKENS,
            json_mode: true,
        };
        let content = self.provider()?.complete(request).await?;
        let parsed: Value = serde_json::from_str(&content).map_err(|_| {
            TailoringServiceError::Unusable("Failed to parse AI response".to_string())
        })?;
        let questions = extract_questions(&parsed);
        if questions.is_empty() {
            tracing::warn!(user_id = %user_id, "Interview prep response contained no questions");
        }

        if let Some(application) = application {
            let stored = serde_json::to_value(&questions)
                .map_err(|e| TailoringServiceError::Other(e.into()))?;
            self.application_repo
                .save_interview_questions(application.id, user_id, &stored)
                .await
                .map_err(|e| TailoringServiceError::Dependency(e.to_string()))?;
        }

        tracing::info!(user_id = %user_id, count = questions.len(), "Interview questions generated");
        Ok(Coached::generated(questions))
    }
}
