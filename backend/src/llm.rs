//! Chat-completions client used to turn grouped email into notifications.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OpenAI API endpoint
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OPENAI_API_KEY not set")]
    MissingApiKey,

    #[error("Generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse generation response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Synchronous, single-shot text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

/// OpenAI chat-completions backend
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Set a custom base URL (useful for Azure OpenAI or proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(GenerationError::MissingApiKey)?;

        let request = build_request(&self.model, prompt);

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        parse_completion(&body)
    }
}

fn build_request<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
    }
}

fn api_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .map(|r| r.error.message)
        .unwrap_or_else(|_| body.to_string());

    GenerationError::Api { status, message }
}

/// Text of the first choice; an empty completion is an empty string
fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let response: ChatResponse = serde_json::from_str(body)?;

    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}
