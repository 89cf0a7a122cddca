//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON5: {0}")]
    Syntax(#[from] json5::Error),
    #[error("config does not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
    /// A layer has an unknown key or a value of the wrong type.
    #[error("{layer}: `{key}` {reason}")]
    Field {
        layer: String,
        key: String,
        reason: &'static str,
    },
    /// The merged config breaks a range constraint.
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("missing required environment variable {0}")]
    MissingVariable(&'static str),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}
