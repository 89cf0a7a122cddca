//! Error types for chat model calls.

/// Errors returned by chat providers.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model api error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The response carried no message content.
    #[error("model returned no content")]
    EmptyResponse,
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Decode(err.to_string())
    }
}
