//! Store abstraction shared by the hosted backend and test stubs.

use crate::error::StoreError;
use crate::filter::MessageFilter;
use crate::schema::DatabaseSchema;
use async_trait::async_trait;
use notemail_rs_protocol::{Message, MessageId, StoredMessage};

#[async_trait]
/// Message store abstraction used by the mailbox.
pub trait MessageStore: Send + Sync {
    /// Persist a message and return the identifier the store assigned.
    async fn create(&self, message: &Message) -> Result<MessageId, StoreError>;

    /// Return every message matching the filter, across all result pages.
    async fn query(&self, filter: &MessageFilter) -> Result<Vec<StoredMessage>, StoreError>;

    /// Fetch a single message by identifier.
    async fn retrieve(&self, id: &str) -> Result<StoredMessage, StoreError>;

    /// Describe the live property schema of the collection.
    async fn describe_schema(&self) -> Result<DatabaseSchema, StoreError>;

    /// Messages whose recipient equals `identity` exactly.
    async fn query_by_recipient(&self, identity: &str) -> Result<Vec<StoredMessage>, StoreError> {
        self.query(&MessageFilter::RecipientEquals(identity.to_string()))
            .await
    }

    /// Messages whose sender, recipient or body contains `term`.
    async fn query_by_substring(&self, term: &str) -> Result<Vec<StoredMessage>, StoreError> {
        self.query(&MessageFilter::ContainsAny(term.to_string()))
            .await
    }

    /// Every message in the collection.
    async fn query_all(&self) -> Result<Vec<StoredMessage>, StoreError> {
        self.query(&MessageFilter::All).await
    }
}
