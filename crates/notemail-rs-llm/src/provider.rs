//! Chat provider abstraction.

use crate::error::LlmError;
use async_trait::async_trait;

/// A single-turn chat exchange: one system prompt, one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
        }
    }
}

#[async_trait]
/// Chat model used to plan commands and summarize their output.
pub trait ChatProvider: Send + Sync {
    /// Send the request and return the reply text, trimmed.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;
}
