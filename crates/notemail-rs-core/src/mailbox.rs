//! Mail operations over the document store and the optional vector index.
//!
//! The store write is the durability boundary of `send`: once it succeeds
//! the message exists, and indexing it is a best-effort follow-up whose
//! failure is reported but never fails the send.

use crate::error::CoreError;
use crate::render::write_separator;
use crate::search::{KeywordOutcome, keyword_search};
use crate::semantic::{SemanticOutcome, SemanticSettings, semantic_search};
use log::{info, warn};
use notemail_rs_protocol::{Identity, Message, MessageId, StoredMessage};
use notemail_rs_store::{MailboxStats, MessageStore, SchemaReport};
use notemail_rs_vector::{EmbedInputType, VectorIndex, VectorRecord};
use std::fmt;
use std::sync::Arc;

/// Store, index and search settings shared by every operation.
#[derive(Clone)]
pub struct Mailbox {
    store: Arc<dyn MessageStore>,
    index: Option<Arc<dyn VectorIndex>>,
    settings: SemanticSettings,
}

/// What happened to the vector index after a successful store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStatus {
    Indexed,
    /// No vector index is configured.
    Unavailable,
    /// Embedding or upsert failed; the message is stored but not searchable.
    Failed(String),
}

/// Outcome of sending a message.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Sent { id: MessageId, index: IndexStatus },
    /// Nothing was stored.
    Rejected(String),
    /// The store write failed.
    Failed(String),
}

/// Outcome of reading an inbox.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Messages(Vec<StoredMessage>),
    Failed(String),
}

impl Mailbox {
    pub fn new(
        store: Arc<dyn MessageStore>,
        index: Option<Arc<dyn VectorIndex>>,
        settings: SemanticSettings,
    ) -> Self {
        Self {
            store,
            index,
            settings,
        }
    }

    pub fn settings(&self) -> &SemanticSettings {
        &self.settings
    }

    /// Store a message from `sender` and mirror it into the index.
    pub async fn send(&self, sender: &Identity, recipient: &str, body: &str) -> SendOutcome {
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return SendOutcome::Rejected("a recipient is required".to_string());
        }
        let message = Message::new_now(sender.as_str(), recipient, body);
        let id = match self.store.create(&message).await {
            Ok(id) => id,
            Err(err) => {
                warn!("send failed (sender={sender}, error={err})");
                return SendOutcome::Failed(err.to_string());
            }
        };
        info!("message stored (id={id}, sender={sender}, recipient={recipient})");
        let index = self.index_message(&id, &message).await;
        SendOutcome::Sent { id, index }
    }

    async fn index_message(&self, id: &str, message: &Message) -> IndexStatus {
        let Some(index) = self.index.as_deref() else {
            return IndexStatus::Unavailable;
        };
        let text = message.flatten().into_string();
        let result = async {
            let values = index.embed_one(&text, EmbedInputType::Passage).await?;
            index
                .upsert(
                    vec![VectorRecord::new(id, values, text.clone())],
                    &self.settings.namespace,
                )
                .await
        }
        .await;
        match result {
            Ok(_) => IndexStatus::Indexed,
            Err(err) => {
                warn!("message not indexed (id={id}, error={err})");
                IndexStatus::Failed(err.to_string())
            }
        }
    }

    /// Messages addressed to `identity`, matched exactly by the store.
    pub async fn read(&self, identity: &Identity) -> ReadOutcome {
        match self.store.query_by_recipient(identity.as_str()).await {
            Ok(messages) => ReadOutcome::Messages(messages),
            Err(err) => {
                warn!("read failed (identity={identity}, error={err})");
                ReadOutcome::Failed(err.to_string())
            }
        }
    }

    pub async fn search(&self, term: &str, identity: &Identity) -> KeywordOutcome {
        keyword_search(self.store.as_ref(), term, identity).await
    }

    pub async fn semantic_search(&self, query: &str, identity: &str) -> SemanticOutcome {
        semantic_search(self.index.as_deref(), query, identity, &self.settings).await
    }

    /// Embed every stored message in passage mode and upsert it.
    ///
    /// Returns the number of vectors written.
    pub async fn reindex(&self) -> Result<usize, CoreError> {
        let index = self
            .index
            .as_deref()
            .ok_or(CoreError::ServiceUnavailable("vector index"))?;
        let messages = self.store.query_all().await?;
        if messages.is_empty() {
            info!("reindex skipped (messages=0)");
            return Ok(0);
        }
        let texts: Vec<String> = messages
            .iter()
            .map(|stored| stored.message.flatten().into_string())
            .collect();
        let vectors = index.embed(&texts, EmbedInputType::Passage).await?;
        let records: Vec<VectorRecord> = messages
            .iter()
            .zip(vectors)
            .zip(texts)
            .map(|((stored, values), text)| VectorRecord::new(stored.id.clone(), values, text))
            .collect();
        let upserted = index.upsert(records, &self.settings.namespace).await?;
        info!(
            "reindex complete (messages={}, upserted={}, namespace={})",
            messages.len(),
            upserted,
            self.settings.namespace
        );
        Ok(upserted)
    }

    pub async fn stats(&self) -> Result<MailboxStats, CoreError> {
        let messages = self.store.query_all().await?;
        Ok(MailboxStats::from_messages(&messages))
    }

    /// Compare the live database schema with the message schema.
    pub async fn doctor(&self) -> Result<SchemaReport, CoreError> {
        let schema = self.store.describe_schema().await?;
        Ok(SchemaReport::check(&schema))
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendOutcome::Sent { index, .. } => {
                writeln!(f, "Mail sent successfully!")?;
                if let IndexStatus::Failed(reason) = index {
                    writeln!(f, "Skipping embedding due to error: {reason}")?;
                    writeln!(f, "Message won't be searchable via semantic search.")?;
                }
                Ok(())
            }
            SendOutcome::Rejected(reason) => writeln!(f, "Error sending mail: {reason}."),
            SendOutcome::Failed(reason) => writeln!(f, "Error sending mail: {reason}"),
        }
    }
}

impl fmt::Display for ReadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadOutcome::Messages(messages) => {
                writeln!(f, "Messages ({}):", messages.len())?;
                writeln!(f)?;
                for stored in messages {
                    writeln!(f, "from: {}", stored.message.sender)?;
                    writeln!(f, "{}", stored.message.body)?;
                    write_separator(f)?;
                }
                if messages.is_empty() {
                    writeln!(f, "No messages found.")?;
                }
                Ok(())
            }
            ReadOutcome::Failed(reason) => writeln!(f, "Error reading mail: {reason}"),
        }
    }
}
