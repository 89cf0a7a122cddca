use async_trait::async_trait;
use notemail_rs_protocol::{Message, MessageId, StoredMessage};
use notemail_rs_store::{DatabaseSchema, MessageFilter, MessageStore, StoreError, expected_schema};
use parking_lot::Mutex;
use std::sync::Arc;

/// Build a stored message row.
pub fn stored_message(
    id: &str,
    sender: &str,
    recipient: &str,
    body: &str,
    timestamp: Option<f64>,
) -> StoredMessage {
    StoredMessage {
        id: id.to_string(),
        message: Message {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            body: body.to_string(),
            timestamp,
        },
    }
}

/// In-memory store evaluating filters the way the hosted database does.
#[derive(Clone)]
pub struct StubStore {
    messages: Arc<Mutex<Vec<StoredMessage>>>,
    filters: Arc<Mutex<Vec<MessageFilter>>>,
    schema: DatabaseSchema,
    fail_create: bool,
    fail_query: bool,
}

impl Default for StubStore {
    fn default() -> Self {
        Self {
            messages: Arc::default(),
            filters: Arc::default(),
            schema: expected_schema(),
            fail_create: false,
            fail_query: false,
        }
    }
}

impl StubStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<StoredMessage>) -> Self {
        let store = Self::default();
        *store.messages.lock() = messages;
        store
    }

    pub fn with_schema(mut self, schema: DatabaseSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Every create call fails.
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Every query, retrieve and schema call fails.
    pub fn failing_query(mut self) -> Self {
        self.fail_query = true;
        self
    }

    pub fn messages(&self) -> Vec<StoredMessage> {
        self.messages.lock().clone()
    }

    /// Filters received by `query`, in call order.
    pub fn filters(&self) -> Vec<MessageFilter> {
        self.filters.lock().clone()
    }

    fn unavailable() -> StoreError {
        StoreError::Api {
            status: 502,
            code: "service_unavailable".to_string(),
            message: "store offline".to_string(),
        }
    }
}

fn matches(filter: &MessageFilter, message: &Message) -> bool {
    match filter {
        MessageFilter::All => true,
        MessageFilter::RecipientEquals(identity) => message.recipient == *identity,
        MessageFilter::ContainsAny(term) => {
            let term = term.to_lowercase();
            [&message.sender, &message.recipient, &message.body]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        }
    }
}

#[async_trait]
impl MessageStore for StubStore {
    async fn create(&self, message: &Message) -> Result<MessageId, StoreError> {
        if self.fail_create {
            return Err(Self::unavailable());
        }
        let mut messages = self.messages.lock();
        let id = format!("page-{}", messages.len() + 1);
        messages.push(StoredMessage {
            id: id.clone(),
            message: message.clone(),
        });
        Ok(id)
    }

    async fn query(&self, filter: &MessageFilter) -> Result<Vec<StoredMessage>, StoreError> {
        self.filters.lock().push(filter.clone());
        if self.fail_query {
            return Err(Self::unavailable());
        }
        Ok(self
            .messages
            .lock()
            .iter()
            .filter(|stored| matches(filter, &stored.message))
            .cloned()
            .collect())
    }

    async fn retrieve(&self, id: &str) -> Result<StoredMessage, StoreError> {
        if self.fail_query {
            return Err(Self::unavailable());
        }
        self.messages
            .lock()
            .iter()
            .find(|stored| stored.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn describe_schema(&self) -> Result<DatabaseSchema, StoreError> {
        if self.fail_query {
            return Err(Self::unavailable());
        }
        Ok(self.schema.clone())
    }
}
