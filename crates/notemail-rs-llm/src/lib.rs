//! Chat model access for the command interpreter.

pub mod error;
pub mod openai;
pub mod provider;

/// LLM error type.
pub use error::LlmError;
/// OpenAI-compatible chat completions client.
pub use openai::{OpenAiChat, OpenAiChatOptions};
/// Chat interface and request type.
pub use provider::{ChatProvider, ChatRequest};
