//! Configuration schema for notemail.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root config for the notemail client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotemailConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub vector: VectorConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl NotemailConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> NotemailConfigBuilder {
        NotemailConfigBuilder::new()
    }
}

/// Builder for assembling a `NotemailConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct NotemailConfigBuilder {
    config: NotemailConfig,
}

impl NotemailConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: NotemailConfig::default(),
        }
    }

    /// Replace the document store configuration.
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Replace the vector index configuration.
    pub fn vector(mut self, vector: VectorConfig) -> Self {
        self.config.vector = vector;
        self
    }

    /// Replace the chat assistant configuration.
    pub fn assistant(mut self, assistant: AssistantConfig) -> Self {
        self.config.assistant = assistant;
        self
    }

    /// Replace the HTTP client configuration.
    pub fn http(mut self, http: HttpConfig) -> Self {
        self.config.http = http;
        self
    }

    /// Finalize and return the built `NotemailConfig`.
    pub fn build(self) -> NotemailConfig {
        self.config
    }
}

/// Hosted document store (Notion) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_api_base")]
    pub api_base: String,
    #[serde(default = "default_notion_version")]
    pub notion_version: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_base: default_store_api_base(),
            notion_version: default_notion_version(),
            page_size: default_page_size(),
        }
    }
}

fn default_store_api_base() -> String {
    "https://api.notion.com".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

/// Largest page size the query endpoint accepts.
fn default_page_size() -> u32 {
    100
}

/// Hosted vector index (Pinecone) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    /// Control-plane base URL, also serving the embed endpoint.
    #[serde(default = "default_control_base")]
    pub control_base: String,
    /// Data-plane host; resolved from the index description when absent.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_index_name")]
    pub index_name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_embed_model")]
    pub embed_model: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: usize,
    /// Inputs per embed request and vectors per upsert request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            control_base: default_control_base(),
            host: None,
            index_name: default_index_name(),
            namespace: default_namespace(),
            embed_model: default_embed_model(),
            api_version: default_api_version(),
            top_k: default_top_k(),
            overfetch_factor: default_overfetch_factor(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_control_base() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_index_name() -> String {
    "notion-mail".to_string()
}

fn default_namespace() -> String {
    "notion_mail".to_string()
}

fn default_embed_model() -> String {
    "llama-text-embed-v2".to_string()
}

fn default_api_version() -> String {
    "2025-01".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_overfetch_factor() -> usize {
    3
}

/// Embed endpoint input limit for the default model.
fn default_batch_size() -> usize {
    96
}

/// Chat-completion assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,
    #[serde(default = "default_assistant_model")]
    pub model: String,
    /// Temperature for turning utterances into commands.
    #[serde(default)]
    pub command_temperature: f32,
    /// Temperature for the conversational summary.
    #[serde(default = "default_summary_temperature")]
    pub summary_temperature: f32,
    /// Instruction document sent as the system prompt for command parsing.
    #[serde(default)]
    pub instructions_path: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_assistant_base_url(),
            model: default_assistant_model(),
            command_temperature: 0.0,
            summary_temperature: default_summary_temperature(),
            instructions_path: None,
        }
    }
}

fn default_assistant_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_assistant_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_summary_temperature() -> f32 {
    0.7
}

/// Timeouts applied to every outbound HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
