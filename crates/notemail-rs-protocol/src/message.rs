//! Message records and retrieval results.

use crate::MessageId;
use crate::flatten::FlattenedText;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Read access to the two participant fields of a mail record.
pub trait Participants {
    /// Sender identity as stored.
    fn sender(&self) -> &str;
    /// Recipient identity as stored.
    fn recipient(&self) -> &str;
}

/// A single mail message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Sender identity.
    pub sender: String,
    /// Recipient identity.
    pub recipient: String,
    /// Message text.
    pub body: String,
    /// Seconds since the Unix epoch; absent on rows written by other tools.
    pub timestamp: Option<f64>,
}

impl Message {
    /// Build a message stamped with the current wall-clock time.
    pub fn new_now(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        let timestamp = now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1e6;
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            body: body.into(),
            timestamp: Some(timestamp),
        }
    }

    /// Canonical flattened form used as the vector index payload.
    pub fn flatten(&self) -> FlattenedText {
        FlattenedText::new(&self.sender, &self.recipient, &self.body)
    }

    /// Timestamp used for ordering; missing values sort first.
    pub fn sort_key(&self) -> f64 {
        self.timestamp.unwrap_or(0.0)
    }
}

impl Participants for Message {
    fn sender(&self) -> &str {
        &self.sender
    }

    fn recipient(&self) -> &str {
        &self.recipient
    }
}

/// A message together with its store-assigned identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredMessage {
    /// Store identifier, also used as the vector id.
    pub id: MessageId,
    /// Message content.
    pub message: Message,
}

impl Participants for StoredMessage {
    fn sender(&self) -> &str {
        &self.message.sender
    }

    fn recipient(&self) -> &str {
        &self.message.recipient
    }
}

/// Ephemeral search hit shown to the user and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedResult {
    /// Identifier of the underlying store row or vector.
    pub source_id: MessageId,
    pub sender: String,
    pub recipient: String,
    pub body: String,
    /// Store timestamp; only keyword results carry one.
    pub timestamp: Option<f64>,
    /// Similarity score; only semantic results carry one.
    pub score: Option<f32>,
}

impl From<StoredMessage> for RetrievedResult {
    fn from(stored: StoredMessage) -> Self {
        Self {
            source_id: stored.id,
            sender: stored.message.sender,
            recipient: stored.message.recipient,
            body: stored.message.body,
            timestamp: stored.message.timestamp,
            score: None,
        }
    }
}

impl Participants for RetrievedResult {
    fn sender(&self) -> &str {
        &self.sender
    }

    fn recipient(&self) -> &str {
        &self.recipient
    }
}

/// Render a timestamp as local `YYYY-mm-dd HH:MM:SS`; empty when missing or zero.
pub fn format_timestamp(timestamp: Option<f64>) -> String {
    let Some(timestamp) = timestamp.filter(|value| *value != 0.0 && value.is_finite()) else {
        return String::new();
    };
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default()
}
