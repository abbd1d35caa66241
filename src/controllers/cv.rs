use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::ats::{self, AtsScore, AtsScoreRequest};
use crate::domain::coaching::{
    CoachingService, CoachingServiceApi, CoverLetterRequest, CoverLetterResponse,
    InterviewPrepRequest, InterviewPrepResponse,
};
use crate::domain::profile::{CvProfile, LayoutStrategy};
use crate::domain::tailoring::sanitizer::sanitize_layout;
use crate::domain::tailoring::{
    GenerateRequest, GenerateResponse, ParseRequest, ParseResponse, TailoringService,
    TailoringServiceApi,
};
use crate::domain::templates::{self, RenderRequest, TemplateStyle};
use crate::domain::usage::UsageNotConsumed;
use crate::{
    error::{AppError, AppResult},
    infrastructure::auth::AuthUser,
};

const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

pub struct CvController {
    tailoring_service: Arc<TailoringService>,
    coaching_service: Arc<CoachingService>,
}

/// A JSON `null` profile counts as missing
fn profile_from(value: Option<Value>) -> Option<CvProfile> {
    value
        .filter(|v| !v.is_null())
        .map(|v| CvProfile::from_value_lenient(&v))
}

/// Tailoring keeps contact details from the source, so it needs a personal section
fn tailorable_profile(value: Option<Value>) -> Option<CvProfile> {
    value
        .filter(|v| v.get("personal").is_some_and(Value::is_object))
        .map(|v| CvProfile::from_value_lenient(&v))
}

/// Unparseable ids behave like unknown applications
fn application_id(raw: Option<&str>) -> Option<Uuid> {
    raw.and_then(|id| Uuid::parse_str(id.trim()).ok())
}

/// Marks a response the quota gate should not charge for: cache hits and parsing
fn uncharged(body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    response.extensions_mut().insert(UsageNotConsumed);
    response
}

impl CvController {
    pub fn new(
        tailoring_service: Arc<TailoringService>,
        coaching_service: Arc<CoachingService>,
    ) -> Self {
        Self {
            tailoring_service,
            coaching_service,
        }
    }

    /// POST /api/cv/generate - Tailor the profile to a job description
    pub async fn generate(
        State(controller): State<Arc<CvController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<GenerateRequest>,
    ) -> AppResult<Response> {
        let (Some(profile), Some(job_description)) =
            (tailorable_profile(request.profile), request.job_description)
        else {
            return Err(AppError::BadRequest(
                "Missing required fields: profile and jobDescription".to_string(),
            ));
        };
        if job_description.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Job description cannot be empty".to_string(),
            ));
        }

        let mut options = request.options;
        options.template_style.get_or_insert(TemplateStyle::Harvard);
        tracing::info!(
            user_id = %auth_user.user_id,
            mode = ?options.mode,
            job_description_len = job_description.len(),
            "Tailoring request"
        );

        let result = controller
            .tailoring_service
            .tailor(&profile, &job_description, &options)
            .await?;

        tracing::info!(
            user_id = %auth_user.user_id,
            match_score = result.match_score,
            "Tailoring completed"
        );

        Ok((
            [
                (CACHE_CONTROL, NO_STORE),
                (PRAGMA, "no-cache"),
                (EXPIRES, "0"),
            ],
            Json(GenerateResponse::new(result, job_description)),
        )
            .into_response())
    }

    /// POST /api/cv/parse - Structure pasted resume text
    pub async fn parse(
        State(controller): State<Arc<CvController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<ParseRequest>,
    ) -> AppResult<Response> {
        let raw_text = request
            .raw_text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("No text content provided for parsing".to_string()))?;

        tracing::info!(user_id = %auth_user.user_id, text_len = raw_text.len(), "Parsing resume text");
        let profile = controller.tailoring_service.parse_profile(&raw_text).await?;
        Ok(uncharged(Json(ParseResponse { profile })))
    }

    /// POST /api/cv/cover-letter
    pub async fn cover_letter(
        State(controller): State<Arc<CvController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<CoverLetterRequest>,
    ) -> AppResult<Response> {
        let job_description = request
            .job_description
            .filter(|jd| !jd.trim().is_empty());
        let (Some(profile), Some(job_description)) =
            (profile_from(request.profile), job_description)
        else {
            return Err(AppError::BadRequest(
                "Profile and job description are required".to_string(),
            ));
        };

        let letter = controller
            .coaching_service
            .cover_letter(
                auth_user.user_id,
                &profile,
                &job_description,
                &request.options,
                application_id(request.application_id.as_deref()),
            )
            .await?;

        let body = Json(CoverLetterResponse {
            cover_letter: letter.value,
            from_cache: letter.from_cache,
        });
        if letter.from_cache {
            return Ok(uncharged(body));
        }
        Ok(body.into_response())
    }

    /// POST /api/cv/interview-prep
    pub async fn interview_prep(
        State(controller): State<Arc<CvController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<InterviewPrepRequest>,
    ) -> AppResult<Response> {
        let profile = profile_from(request.profile);
        let questions = controller
            .coaching_service
            .interview_questions(
                auth_user.user_id,
                profile.as_ref(),
                request.job_description.as_deref(),
                request.question_type.as_deref(),
                application_id(request.application_id.as_deref()),
            )
            .await?;

        let body = Json(InterviewPrepResponse {
            questions: questions.value,
            from_cache: questions.from_cache,
        });
        if questions.from_cache {
            return Ok(uncharged(body));
        }
        Ok(body.into_response())
    }

    /// POST /api/cv/render - Server-side HTML for one of the templates
    pub async fn render(Json(request): Json<RenderRequest>) -> AppResult<Response> {
        let profile = profile_from(request.profile)
            .ok_or_else(|| AppError::BadRequest("Profile is required".to_string()))?;
        let layout = request
            .layout_strategy
            .as_ref()
            .map(sanitize_layout)
            .unwrap_or_else(LayoutStrategy::default);
        let style = match request.template.as_deref() {
            Some(name) => name.parse::<TemplateStyle>().map_err(AppError::BadRequest)?,
            None => TemplateStyle::default(),
        };

        let html = templates::render(&profile, &layout, style);
        Ok(([(CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response())
    }

    /// POST /api/cv/ats-score
    pub async fn ats_score(Json(request): Json<AtsScoreRequest>) -> AppResult<Json<AtsScore>> {
        let profile = profile_from(request.profile)
            .ok_or_else(|| AppError::BadRequest("Profile is required".to_string()))?;
        Ok(Json(ats::score(&profile, request.job_description.as_deref())))
    }
}
