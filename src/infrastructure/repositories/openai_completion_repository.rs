use super::completion_repository::{CompletionError, CompletionRepository, CompletionRequest};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI chat completions implementation of the completion repository
pub struct OpenAiCompletionRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiCompletionRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    pub fn from_api_key(api_key: &str, model: String) -> Self {
        let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
        Self::new(Arc::new(client), model)
    }
}

/// Map an SDK error onto the provider-neutral error, keyed on the API error code
pub fn classify_openai_error(error: OpenAIError) -> CompletionError {
    match error {
        OpenAIError::ApiError(api_error) => match api_error.code.as_deref() {
            Some("insufficient_quota") => CompletionError::QuotaExceeded,
            Some("invalid_api_key") => CompletionError::InvalidApiKey,
            _ => CompletionError::Failed(api_error.message),
        },
        other => CompletionError::Failed(other.to_string()),
    }
}

#[async_trait]
impl CompletionRepository for OpenAiCompletionRepository {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        tracing::info!(
            model = %self.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            json_mode = request.json_mode,
            prompt_length = request.user.len(),
            "Calling OpenAI chat completions"
        );

        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system)
            .build()
            .map_err(classify_openai_error)?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user)
            .build()
            .map_err(classify_openai_error)?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![system.into(), user.into()];

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens);
        if request.json_mode {
            builder.response_format(ResponseFormat::JsonObject);
        }
        let chat_request = builder.build().map_err(classify_openai_error)?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            tracing::error!(error = %e, "OpenAI API error");
            classify_openai_error(e)
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(CompletionError::Empty)?;

        tracing::debug!(response_length = content.len(), "OpenAI completion received");
        Ok(content)
    }
}
