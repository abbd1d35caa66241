pub mod detection;
pub mod error;
pub mod prompt;
pub mod sanitizer;
pub mod service;

pub use detection::{detect_copy, CopyIssue, CopyReport};
pub use error::TailoringServiceError;
pub use service::{TailoringService, TailoringServiceApi};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::profile::{lenient, CvProfile, LayoutStrategy};
use crate::domain::templates::TemplateStyle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailorMode {
    /// Only facts stated in the profile
    Strict,
    #[default]
    Creative,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TailorOptions {
    #[serde(deserialize_with = "any_mode")]
    pub mode: TailorMode,
    #[serde(deserialize_with = "text_or_none")]
    pub custom_instructions: Option<String>,
    #[serde(deserialize_with = "known_style")]
    pub template_style: Option<TemplateStyle>,
}

/// Anything other than "strict" tailors creatively
fn any_mode<'de, D>(deserializer: D) -> Result<TailorMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value.as_str().map(str::trim) {
        Some(mode) if mode.eq_ignore_ascii_case("strict") => TailorMode::Strict,
        _ => TailorMode::Creative,
    })
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

/// Unknown style names are ignored
fn known_style<'de, D>(deserializer: D) -> Result<Option<TemplateStyle>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(|name| name.parse().ok()))
}

/// Sanitized outcome of one tailoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysisResult {
    pub tailored_profile: CvProfile,
    pub layout_strategy: LayoutStrategy,
    pub match_score: i32,
    pub suggestions: Vec<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
}

/// Request for POST /api/cv/generate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub profile: Option<Value>,
    pub job_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub options: TailorOptions,
}

/// Response for POST /api/cv/generate
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub tailored_profile: CvProfile,
    pub layout_strategy: LayoutStrategy,
    pub match_score: i32,
    pub suggestions: Vec<String>,
    pub original_description: String,
    pub job_title: String,
    pub company_name: String,
}

impl GenerateResponse {
    pub fn new(result: JobAnalysisResult, original_description: String) -> Self {
        Self {
            tailored_profile: result.tailored_profile,
            layout_strategy: result.layout_strategy,
            match_score: result.match_score,
            suggestions: result.suggestions,
            original_description,
            job_title: result.job_title.unwrap_or_default(),
            company_name: result.company_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub raw_text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub profile: CvProfile,
}
