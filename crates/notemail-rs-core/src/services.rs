//! Construction of the external clients from configuration.
//!
//! Every client is built once here and shared by reference afterwards.

use crate::error::CoreError;
use crate::instructions::load_instructions;
use crate::interpreter::Interpreter;
use crate::mailbox::Mailbox;
use crate::semantic::SemanticSettings;
use log::info;
use notemail_rs_config::{
    ASSISTANT_KEY_VAR, AssistantConfig, ConfigError, Credentials, NotemailConfig, VectorConfig,
};
use notemail_rs_llm::{ChatProvider, OpenAiChat, OpenAiChatOptions};
use notemail_rs_store::{MessageStore, NotionStore, NotionStoreOptions};
use notemail_rs_vector::{PineconeIndex, PineconeOptions, VectorIndex};
use std::path::Path;
use std::sync::Arc;

/// The mailbox plus the chat model, when one is configured.
#[derive(Clone)]
pub struct MailServices {
    pub mailbox: Mailbox,
    chat: Option<Arc<dyn ChatProvider>>,
}

impl MailServices {
    pub fn new(mailbox: Mailbox, chat: Option<Arc<dyn ChatProvider>>) -> Self {
        Self { mailbox, chat }
    }

    /// Build every client the credentials allow.
    ///
    /// The vector index and the chat model are optional; their absence only
    /// disables the features that need them.
    pub fn from_config(
        config: &NotemailConfig,
        credentials: &Credentials,
    ) -> Result<Self, CoreError> {
        let store: Arc<dyn MessageStore> = Arc::new(NotionStore::new(NotionStoreOptions {
            api_base: config.store.api_base.clone(),
            notion_version: config.store.notion_version.clone(),
            token: credentials.store_key.clone(),
            database_id: credentials.database_id.clone(),
            page_size: config.store.page_size,
            timeout: config.http.timeout(),
            connect_timeout: config.http.connect_timeout(),
        })?);

        let index: Option<Arc<dyn VectorIndex>> = match &credentials.vector {
            Some(vector) => {
                let index = PineconeIndex::new(PineconeOptions {
                    control_base: config.vector.control_base.clone(),
                    host: config.vector.host.clone(),
                    api_key: vector.api_key.clone(),
                    index_name: config.vector.index_name.clone(),
                    embed_model: config.vector.embed_model.clone(),
                    api_version: config.vector.api_version.clone(),
                    batch_size: config.vector.batch_size,
                    timeout: config.http.timeout(),
                    connect_timeout: config.http.connect_timeout(),
                })?;
                Some(Arc::new(index))
            }
            None => None,
        };

        let chat: Option<Arc<dyn ChatProvider>> = match &credentials.assistant_key {
            Some(api_key) => Some(Arc::new(OpenAiChat::new(OpenAiChatOptions {
                base_url: config.assistant.base_url.clone(),
                api_key: api_key.clone(),
                model: config.assistant.model.clone(),
                timeout: config.http.timeout(),
                connect_timeout: config.http.connect_timeout(),
            })?)),
            None => None,
        };

        info!(
            "services ready (vector_index={}, chat_model={})",
            index.is_some(),
            chat.is_some()
        );
        Ok(Self {
            mailbox: Mailbox::new(store, index, semantic_settings(&config.vector)),
            chat,
        })
    }

    /// The chat model, or a configuration error naming the missing key.
    pub fn require_chat(&self) -> Result<Arc<dyn ChatProvider>, CoreError> {
        self.chat
            .clone()
            .ok_or(CoreError::Config(ConfigError::MissingVariable(
                ASSISTANT_KEY_VAR,
            )))
    }

    /// Interpreter over this mailbox, with instructions resolved against `cwd`.
    pub fn interpreter(
        &self,
        assistant: &AssistantConfig,
        cwd: &Path,
    ) -> Result<Interpreter, CoreError> {
        let llm = self.require_chat()?;
        let instructions = load_instructions(assistant.instructions_path.as_deref(), cwd);
        Ok(Interpreter::new(
            self.mailbox.clone(),
            llm,
            instructions,
            assistant,
        ))
    }
}

pub fn semantic_settings(vector: &VectorConfig) -> SemanticSettings {
    SemanticSettings {
        namespace: vector.namespace.clone(),
        top_k: vector.top_k,
        overfetch_factor: vector.overfetch_factor,
    }
}
