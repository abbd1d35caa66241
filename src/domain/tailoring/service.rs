use super::detection::detect_copy;
use super::error::TailoringServiceError;
use super::prompt::{
    build_parse_prompt, build_tailor_prompt, temperature, PARSE_MAX_TOKENS, PARSE_SYSTEM_PROMPT,
    PARSE_TEMPERATURE, TAILOR_MAX_TOKENS, TAILOR_SYSTEM_PROMPT,
};
use super::sanitizer::{
    sanitize_layout, sanitize_match_score, sanitize_suggestions, sanitize_tailored_profile,
};
use super::{JobAnalysisResult, TailorOptions};
use crate::domain::profile::lenient::value_to_string;
use crate::domain::profile::CvProfile;
use crate::infrastructure::repositories::{CompletionRepository, CompletionRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub struct TailoringService {
    completion: Option<Arc<dyn CompletionRepository>>,
}

impl TailoringService {
    /// `completion` is `None` when no provider key is configured
    pub fn new(completion: Option<Arc<dyn CompletionRepository>>) -> Self {
        Self { completion }
    }

    fn provider(&self) -> Result<&Arc<dyn CompletionRepository>, TailoringServiceError> {
        self.completion
            .as_ref()
            .ok_or(TailoringServiceError::NotConfigured)
    }

    /// One tailoring call; returns the parsed response object which is
    /// guaranteed to carry a `tailoredProfile` object.
    async fn request_tailoring(
        &self,
        profile: &CvProfile,
        job_description: &str,
        options: &TailorOptions,
        retry: bool,
    ) -> Result<Value, TailoringServiceError> {
        let request = CompletionRequest {
            system: TAILOR_SYSTEM_PROMPT.to_string(),
            user: build_tailor_prompt(profile, job_description, options, retry),
            temperature: temperature(options.mode, retry),
            max_tokens: TAILOR_MAX_TOKENS,
            json_mode: true,
        };

        let content = self.provider()?.complete(request).await?;
        let response: Value = serde_json::from_str(&content)
            .map_err(|e| TailoringServiceError::Failed(format!("Invalid JSON from AI: {}", e)))?;

        if !response["tailoredProfile"].is_object() {
            return Err(TailoringServiceError::Failed(
                "Invalid response structure from AI: missing tailoredProfile".to_string(),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
pub trait TailoringServiceApi: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Rewrite `profile` for `job_description`, retrying once when the model
    /// hands back the source text.
    async fn tailor(
        &self,
        profile: &CvProfile,
        job_description: &str,
        options: &TailorOptions,
    ) -> Result<JobAnalysisResult, TailoringServiceError>;

    /// Extract a structured profile from pasted resume text
    async fn parse_profile(&self, raw_text: &str) -> Result<CvProfile, TailoringServiceError>;
}

#[async_trait]
impl TailoringServiceApi for TailoringService {
    fn is_configured(&self) -> bool {
        self.completion.is_some()
    }

    async fn tailor(
        &self,
        profile: &CvProfile,
        job_description: &str,
        options: &TailorOptions,
    ) -> Result<JobAnalysisResult, TailoringServiceError> {
        let mut response = self
            .request_tailoring(profile, job_description, options, false)
            .await?;

        let report = detect_copy(&response["tailoredProfile"], profile);
        if report.is_unchanged() {
            tracing::warn!(issues = ?report.issues, "AI returned unchanged content, retrying");
            response = self
                .request_tailoring(profile, job_description, options, true)
                .await?;
        }

        let job_title = Some(value_to_string(&response["jobTitle"])).filter(|s| !s.is_empty());
        let company_name =
            Some(value_to_string(&response["companyName"])).filter(|s| !s.is_empty());

        let result = JobAnalysisResult {
            tailored_profile: sanitize_tailored_profile(&response["tailoredProfile"], profile),
            layout_strategy: sanitize_layout(&response["layoutStrategy"]),
            match_score: sanitize_match_score(&response["matchScore"]),
            suggestions: sanitize_suggestions(&response["suggestions"]),
            job_title,
            company_name,
        };

        tracing::info!(
            match_score = result.match_score,
            retried = report.is_unchanged(),
            "Tailored profile generated"
        );

        Ok(result)
    }

    async fn parse_profile(&self, raw_text: &str) -> Result<CvProfile, TailoringServiceError> {
        let request = CompletionRequest {
            system: PARSE_SYSTEM_PROMPT.to_string(),
            user: build_parse_prompt(raw_text),
            temperature: PARSE_TEMPERATURE,
            max_tokens: PARSE_MAX_TOKENS,
            json_mode: true,
        };

        let content = self
            .provider()?
            .complete(request)
            .await
            .map_err(|e| match TailoringServiceError::from(e) {
                TailoringServiceError::Failed(msg) => {
                    TailoringServiceError::Unusable(format!("Failed to parse profile: {}", msg))
                }
                other => other,
            })?;

        let parsed: Value = serde_json::from_str(&content).map_err(|e| {
            TailoringServiceError::Unusable(format!("Failed to parse profile: {}", e))
        })?;

        Ok(CvProfile::from_value_lenient(&parsed))
    }
}
