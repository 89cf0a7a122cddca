//! Error types for the core crate.

use crate::interpreter::CommandPlan;
use notemail_rs_config::ConfigError;
use notemail_rs_llm::LlmError;
use notemail_rs_store::StoreError;
use notemail_rs_vector::VectorError;
use thiserror::Error;

/// Errors returned by mailbox operations and service wiring.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("vector error: {0}")]
    Vector(#[from] VectorError),
    #[error("model error: {0}")]
    Llm(#[from] LlmError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// An optional collaborator is not configured.
    #[error("{0} is not configured")]
    ServiceUnavailable(&'static str),
}

/// A chat turn that did not reach a summary.
#[derive(Debug, Error)]
pub enum TurnError {
    /// No commands ran.
    #[error(transparent)]
    Planning(#[from] LlmError),
    /// Commands ran; their output is kept so it can still be shown.
    #[error("{source}")]
    Summary {
        plan: CommandPlan,
        output: String,
        #[source]
        source: LlmError,
    },
}
