use super::completion_repository::{CompletionError, CompletionRepository, CompletionRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Gemini `generateContent` REST implementation of the completion repository
pub struct GeminiCompletionRepository {
    api_key: String,
    model: String,
    api_url: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiCompletionRepository {
    pub fn new(api_key: String, model: String, api_url: String) -> Self {
        Self {
            api_key,
            model,
            api_url: api_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> CompletionError {
        let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let message = parsed
            .as_ref()
            .map(|e| e.error.message.clone())
            .unwrap_or_else(|| body.to_string());
        let api_status = parsed.map(|e| e.error.status).unwrap_or_default();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || api_status == "RESOURCE_EXHAUSTED" {
            CompletionError::QuotaExceeded
        } else if message.contains("API key") || api_status == "UNAUTHENTICATED" {
            CompletionError::InvalidApiKey
        } else {
            CompletionError::Failed(format!("Gemini request failed ({}): {}", status, message))
        }
    }
}

#[async_trait]
impl CompletionRepository for GeminiCompletionRepository {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        tracing::info!(
            model = %self.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            json_mode = request.json_mode,
            "Calling Gemini generateContent"
        );

        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system,
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: request.user }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request.json_mode.then_some("application/json"),
            },
        };

        let response = self
            .http_client
            .post(format!(
                "{}/models/{}:generateContent",
                self.api_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Failed(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Failed(format!("Gemini response unreadable: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, "Gemini API error");
            return Err(Self::classify_error(status, &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| CompletionError::Failed(format!("Gemini response malformed: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or(CompletionError::Empty)
    }
}
