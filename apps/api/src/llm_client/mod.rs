//! LLM Client — the single point of entry for chat-completion calls.
//!
//! Speaks the OpenAI-compatible `/chat/completions` API. Callers depend on the
//! `ChatModel` trait so tests and alternative backends can stand in for it.
//!
//! No retries: a failed call surfaces to the caller. The only repeated request
//! is the structured-output downgrade, which the caller decides on.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod json;
pub mod prompts;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model does not support structured output: {0}")]
    UnsupportedResponseFormat(String),
}

/// How the model is asked to shape its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// `response_format: {"type": "json_object"}`
    JsonObject,
    Plain,
}

/// One-shot chat capability: a system instruction plus a user prompt in,
/// the assistant's text out (empty if the model returned no content).
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        mode: ResponseMode,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, trimmed; empty when the model sent nothing.
    pub fn text(&self) -> String {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, system: &'a str, prompt: &'a str, mode: ResponseMode) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            response_format: match mode {
                ResponseMode::JsonObject => Some(ResponseFormat {
                    format_type: "json_object",
                }),
                ResponseMode::Plain => None,
            },
        }
    }
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            model,
            base_url,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a single call to the chat-completions API, returning the full response.
    pub async fn call(
        &self,
        system: &str,
        prompt: &str,
        mode: ResponseMode,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest::new(&self.model, system, prompt, mode);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            if mode == ResponseMode::JsonObject
                && rejects_response_format(status.as_u16(), &message)
            {
                return Err(LlmError::UnsupportedResponseFormat(message));
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        mode: ResponseMode,
    ) -> Result<String, LlmError> {
        Ok(self.call(system, prompt, mode).await?.text())
    }
}

/// True when a 4xx reply says the model cannot honour `response_format`.
fn rejects_response_format(status: u16, message: &str) -> bool {
    if status != 400 && status != 422 {
        return false;
    }
    let message = message.to_lowercase();
    message.contains("response_format")
        || message.contains("json_object")
        || (message.contains("not supported") && message.contains("json"))
}
