//! Credential discovery from environment variables.

use crate::{ConfigError, NotemailConfig};
use log::{debug, info};
use std::fmt;

/// Document store integration token.
pub const STORE_KEY_VAR: &str = "NOTION_KEY";
/// Document store collection (database) identifier.
pub const DATABASE_ID_VAR: &str = "DATABASE_ID";
/// Vector service API key; semantic search is unavailable without it.
pub const VECTOR_KEY_VAR: &str = "PINECONE_API_KEY";
/// Overrides `vector.index_name`.
pub const VECTOR_INDEX_VAR: &str = "PINECONE_INDEX_NAME";
/// Overrides `vector.namespace`.
pub const VECTOR_NAMESPACE_VAR: &str = "PINECONE_NAMESPACE";
/// Chat model API key; needed only by the chat assistant.
pub const ASSISTANT_KEY_VAR: &str = "OPENAI_API_KEY";

/// Secrets and identifiers that never live in config files.
#[derive(Clone)]
pub struct Credentials {
    pub store_key: String,
    pub database_id: String,
    pub vector: Option<VectorCredentials>,
    pub assistant_key: Option<String>,
}

/// Vector service key plus optional index overrides.
#[derive(Clone)]
pub struct VectorCredentials {
    pub api_key: String,
    pub index_name: Option<String>,
    pub namespace: Option<String>,
}

impl Credentials {
    /// Resolve credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let store_key = read(STORE_KEY_VAR).ok_or(ConfigError::MissingVariable(STORE_KEY_VAR))?;
        let database_id =
            read(DATABASE_ID_VAR).ok_or(ConfigError::MissingVariable(DATABASE_ID_VAR))?;

        let vector = read(VECTOR_KEY_VAR).map(|api_key| VectorCredentials {
            api_key,
            index_name: read(VECTOR_INDEX_VAR),
            namespace: read(VECTOR_NAMESPACE_VAR),
        });
        if vector.is_none() {
            debug!("{VECTOR_KEY_VAR} not set; semantic search disabled");
        }
        let assistant_key = read(ASSISTANT_KEY_VAR);

        info!(
            "credentials resolved (vector_configured={}, assistant_configured={})",
            vector.is_some(),
            assistant_key.is_some()
        );
        Ok(Self {
            store_key,
            database_id,
            vector,
            assistant_key,
        })
    }

    /// Apply environment overrides for non-secret settings.
    pub fn apply_overrides(&self, config: &mut NotemailConfig) {
        let Some(vector) = &self.vector else {
            return;
        };
        if let Some(index_name) = &vector.index_name {
            config.vector.index_name = index_name.clone();
        }
        if let Some(namespace) = &vector.namespace {
            config.vector.namespace = namespace.clone();
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("store_key", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .field("vector", &self.vector)
            .field(
                "assistant_key",
                &self.assistant_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl fmt::Debug for VectorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorCredentials")
            .field("api_key", &"[REDACTED]")
            .field("index_name", &self.index_name)
            .field("namespace", &self.namespace)
            .finish()
    }
}
