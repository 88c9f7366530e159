//! Chat-completion client for the hosted model.
//!
//! One prompt in, one completion out. Every call is a single round trip with
//! a timeout; failures come back as a [`CompletionError`] so callers can tell
//! a bad credential from an exhausted quota or a garbled payload.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("the model did not answer within the configured timeout")]
    Timeout,

    #[error("the model API rejected the credential")]
    Unauthorized,

    #[error("the model API quota or rate limit was exceeded")]
    QuotaExceeded,

    #[error("the model API returned an unusable response: {0}")]
    MalformedResponse(String),

    #[error("the model API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not reach the model API: {0}")]
    Transport(String),
}

/// Anything that can turn a prompt into completion text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Model identifier reported alongside results.
    fn model(&self) -> &str;
}

#[derive(Clone)]
pub struct CompletionSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(settings: CompletionSettings) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                CompletionError::Transport(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key,
            model: settings.model,
            temperature: settings.temperature,
            timeout: settings.timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            warn!("Model request timed out after {:?}", self.timeout);
            CompletionError::Timeout
        } else {
            warn!("Model request failed: {}", err);
            CompletionError::Transport(err.to_string())
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Model API returned an error status");
            return Err(match status.as_u16() {
                401 | 403 => CompletionError::Unauthorized,
                429 => CompletionError::QuotaExceeded,
                code => CompletionError::Api {
                    status: code,
                    message: api_error_message(&text),
                },
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| CompletionError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::MalformedResponse("no choices returned".to_string()))?
            .message
            .content
            .ok_or_else(|| {
                CompletionError::MalformedResponse("first choice has no content".to_string())
            })?;

        debug!(completion_chars = content.chars().count(), "Chat completion received");
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.chars().take(200).collect(),
    }
}
