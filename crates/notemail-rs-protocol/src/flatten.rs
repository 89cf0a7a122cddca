//! Canonical flattened text of a message, as stored in the vector index.

use crate::message::Participants;
use serde::{Deserialize, Serialize};
use std::fmt;

const SENDER_PREFIX: &str = "Sender:";
const RECIPIENT_PREFIX: &str = "Recipient:";
const BODY_PREFIX: &str = "Message:";

/// `"Sender: {sender}\nRecipient: {recipient}\nMessage: {body}"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FlattenedText(String);

/// Participant and body fields recovered from flattened text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText {
    pub sender: String,
    pub recipient: String,
    pub body: String,
}

impl FlattenedText {
    /// Flatten the three message fields.
    pub fn new(sender: &str, recipient: &str, body: &str) -> Self {
        Self(format!(
            "{SENDER_PREFIX} {sender}\n{RECIPIENT_PREFIX} {recipient}\n{BODY_PREFIX} {body}"
        ))
    }

    /// Wrap text read back from the index.
    pub fn from_raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Split on the first two newlines and strip the field labels.
    ///
    /// Returns `None` when the text has fewer than two lines. The body keeps
    /// any newlines it contains.
    pub fn parse(&self) -> Option<ParsedText> {
        let mut parts = self.0.splitn(3, '\n');
        let sender_line = parts.next()?;
        let recipient_line = parts.next()?;
        let body_part = parts.next().unwrap_or_default();

        Some(ParsedText {
            sender: strip_label(sender_line.trim_end_matches('\r'), SENDER_PREFIX).to_string(),
            recipient: strip_label(recipient_line.trim_end_matches('\r'), RECIPIENT_PREFIX)
                .to_string(),
            body: strip_label(body_part, BODY_PREFIX).to_string(),
        })
    }
}

impl fmt::Display for FlattenedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Participants for ParsedText {
    fn sender(&self) -> &str {
        &self.sender
    }

    fn recipient(&self) -> &str {
        &self.recipient
    }
}

/// Remove a leading label and the single space that follows it.
fn strip_label<'a>(line: &'a str, label: &str) -> &'a str {
    match line.strip_prefix(label) {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}
