//! Error types for vector index operations.

/// Errors returned by vector index clients.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service rejected the request.
    #[error("vector api error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// The service returned a different number of embeddings than inputs.
    #[error("expected {expected} embeddings, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },
    /// The index description carried no data-plane host.
    #[error("index {0} has no data-plane host")]
    HostUnresolved(String),
}

impl From<serde_json::Error> for VectorError {
    fn from(err: serde_json::Error) -> Self {
        VectorError::Decode(err.to_string())
    }
}
