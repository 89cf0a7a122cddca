//! Configuration models, layered config loading and credential discovery.
//!
//! Non-secret settings come from layered JSON5 files; API keys and the store
//! collection identifier come only from the environment.

mod credentials;
mod error;
mod loader;
mod model;

/// Credentials resolved from the environment.
pub use credentials::{
    ASSISTANT_KEY_VAR, Credentials, DATABASE_ID_VAR, STORE_KEY_VAR, VECTOR_INDEX_VAR,
    VECTOR_KEY_VAR, VECTOR_NAMESPACE_VAR, VectorCredentials,
};
/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
