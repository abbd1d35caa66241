use async_trait::async_trait;

/// One chat-style completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object response
    pub json_mode: bool,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum CompletionError {
    /// Provider account is out of credit
    #[error("AI provider quota exceeded")]
    QuotaExceeded,
    #[error("AI provider rejected the configured API key")]
    InvalidApiKey,
    #[error("AI provider returned no content")]
    Empty,
    #[error("{0}")]
    Failed(String),
}

/// Repository for LLM completions.
/// Abstracts the underlying provider (OpenAI, Gemini, ...).
///
/// Implementations classify provider failures into [`CompletionError`] so
/// callers can map account problems differently from transient failures.
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Returns the raw text content of the first choice
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
