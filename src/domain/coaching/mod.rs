pub mod prompt;
pub mod service;

pub use service::{CoachingService, CoachingServiceApi};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::profile::lenient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverLetterTone {
    #[default]
    Professional,
    Enthusiastic,
    Confident,
}

impl CoverLetterTone {
    pub fn instruction(self) -> &'static str {
        match self {
            CoverLetterTone::Professional => {
                "Write in a formal, polished tone suitable for corporate environments."
            }
            CoverLetterTone::Enthusiastic => {
                "Write with energy and genuine excitement about the opportunity."
            }
            CoverLetterTone::Confident => {
                "Write with a strong, assertive tone that highlights achievements."
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverLetterOptions {
    pub tone: CoverLetterTone,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
}

/// Request for POST /api/cv/cover-letter
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub profile: Option<Value>,
    pub job_description: Option<String>,
    pub options: CoverLetterOptions,
    pub application_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub from_cache: bool,
}

/// Request for POST /api/cv/interview-prep
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterviewPrepRequest {
    pub profile: Option<Value>,
    pub job_description: Option<String>,
    pub question_type: Option<String>,
    pub application_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewQuestion {
    #[serde(deserialize_with = "lenient::string")]
    pub question: String,
    /// behavioral, technical or situational
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tip: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPrepResponse {
    pub questions: Vec<InterviewQuestion>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub from_cache: bool,
}

/// A generated artifact, or one served from an application's cache
#[derive(Debug, Clone, PartialEq)]
pub struct Coached<T> {
    pub value: T,
    pub from_cache: bool,
}

impl<T> Coached<T> {
    pub fn generated(value: T) -> Self {
        Self {
            value,
            from_cache: false,
        }
    }

    pub fn cached(value: T) -> Self {
        Self {
            value,
            from_cache: true,
        }
    }
}
