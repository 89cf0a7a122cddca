//! Error types for store operations.

/// Errors returned by message stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The store rejected the request.
    #[error("store api error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    /// The requested record does not exist.
    #[error("message not found: {0}")]
    NotFound(String),
    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}
