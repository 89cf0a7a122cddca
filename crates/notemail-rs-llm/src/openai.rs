//! OpenAI-compatible `chat/completions` client.

use crate::error::LlmError;
use crate::provider::{ChatProvider, ChatRequest};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection options for [`OpenAiChat`].
#[derive(Clone)]
pub struct OpenAiChatOptions {
    /// API root including the version segment, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for OpenAiChatOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatOptions")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// Chat provider speaking the OpenAI chat completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: Client,
    options: OpenAiChatOptions,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiChat {
    pub fn new(options: OpenAiChatOptions) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()?;
        Ok(Self { client, options })
    }

    pub fn model(&self) -> &str {
        &self.options.model
    }
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.options.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
        };
        let url = format!(
            "{}/chat/completions",
            self.options.base_url.trim_end_matches('/')
        );
        debug!(
            "chat completion request (model={}, temperature={})",
            self.options.model, request.temperature
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.options.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let text = response.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&text)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(LlmError::EmptyResponse)
    }
}
