//! Typed mapping between messages and the database property schema.
//!
//! The collection has exactly four properties: `Sender` and `Recipient`
//! (rich text), `Message` (the title column) and `Timestamp` (number).

use crate::error::StoreError;
use notemail_rs_protocol::{Message, StoredMessage};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub(crate) const SENDER_PROPERTY: &str = "Sender";
pub(crate) const RECIPIENT_PROPERTY: &str = "Recipient";
pub(crate) const MESSAGE_PROPERTY: &str = "Message";
pub(crate) const TIMESTAMP_PROPERTY: &str = "Timestamp";

/// Maximum characters the store accepts in a single text fragment.
const MAX_FRAGMENT_CHARS: usize = 2000;

/// Property types used by the message schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    RichText,
    Title,
    Number,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::RichText => f.write_str("rich_text"),
            PropertyKind::Title => f.write_str("title"),
            PropertyKind::Number => f.write_str("number"),
            PropertyKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// Properties written when a message is created.
#[derive(Debug, Serialize)]
pub(crate) struct MessageProperties {
    #[serde(rename = "Sender")]
    sender: RichTextProperty,
    #[serde(rename = "Recipient")]
    recipient: RichTextProperty,
    #[serde(rename = "Message")]
    message: TitleProperty,
    #[serde(rename = "Timestamp", skip_serializing_if = "Option::is_none")]
    timestamp: Option<NumberProperty>,
}

impl From<&Message> for MessageProperties {
    fn from(message: &Message) -> Self {
        Self {
            sender: RichTextProperty {
                rich_text: fragments(&message.sender),
            },
            recipient: RichTextProperty {
                rich_text: fragments(&message.recipient),
            },
            message: TitleProperty {
                title: fragments(&message.body),
            },
            timestamp: message.timestamp.map(|number| NumberProperty { number }),
        }
    }
}

#[derive(Debug, Serialize)]
struct RichTextProperty {
    rich_text: Vec<TextFragment>,
}

#[derive(Debug, Serialize)]
struct TitleProperty {
    title: Vec<TextFragment>,
}

#[derive(Debug, Serialize)]
struct NumberProperty {
    number: f64,
}

#[derive(Debug, Serialize)]
struct TextFragment {
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextContent,
}

#[derive(Debug, Serialize)]
struct TextContent {
    content: String,
}

/// Split text into fragments that respect the per-fragment size limit.
fn fragments(value: &str) -> Vec<TextFragment> {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return vec![TextFragment {
            kind: "text",
            text: TextContent {
                content: String::new(),
            },
        }];
    }
    chars
        .chunks(MAX_FRAGMENT_CHARS)
        .map(|chunk| TextFragment {
            kind: "text",
            text: TextContent {
                content: chunk.iter().collect(),
            },
        })
        .collect()
}

/// Page object returned by create/query/retrieve.
#[derive(Debug, Deserialize)]
pub(crate) struct PageObject {
    pub(crate) id: String,
    #[serde(default)]
    properties: HashMap<String, PropertyValue>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PropertyValue {
    RichText {
        #[serde(default)]
        rich_text: Vec<PlainText>,
    },
    Title {
        #[serde(default)]
        title: Vec<PlainText>,
    },
    Number {
        number: Option<f64>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct PlainText {
    #[serde(default)]
    plain_text: String,
}

impl PageObject {
    /// Concatenated plain text of a text property; empty when absent.
    fn text(&self, name: &str) -> String {
        match self.properties.get(name) {
            Some(PropertyValue::RichText { rich_text: parts })
            | Some(PropertyValue::Title { title: parts }) => {
                parts.iter().map(|part| part.plain_text.as_str()).collect()
            }
            _ => String::new(),
        }
    }

    fn number(&self, name: &str) -> Option<f64> {
        match self.properties.get(name) {
            Some(PropertyValue::Number { number }) => *number,
            _ => None,
        }
    }

    /// Whether the page carries any of the message columns.
    pub(crate) fn is_message_row(&self) -> bool {
        [SENDER_PROPERTY, RECIPIENT_PROPERTY, MESSAGE_PROPERTY]
            .iter()
            .any(|name| self.properties.contains_key(*name))
    }

    pub(crate) fn into_stored(self) -> StoredMessage {
        let message = Message {
            sender: self.text(SENDER_PROPERTY),
            recipient: self.text(RECIPIENT_PROPERTY),
            body: self.text(MESSAGE_PROPERTY),
            timestamp: self.number(TIMESTAMP_PROPERTY),
        };
        StoredMessage {
            id: self.id,
            message,
        }
    }
}

/// Property definitions of a database, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSchema {
    pub properties: BTreeMap<String, PropertyKind>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatabaseObject {
    #[serde(default)]
    properties: HashMap<String, PropertyDefinition>,
}

#[derive(Debug, Deserialize)]
struct PropertyDefinition {
    #[serde(rename = "type")]
    kind: PropertyKind,
}

impl From<DatabaseObject> for DatabaseSchema {
    fn from(object: DatabaseObject) -> Self {
        Self {
            properties: object
                .properties
                .into_iter()
                .map(|(name, definition)| (name, definition.kind))
                .collect(),
        }
    }
}

/// The schema every message collection must provide.
pub fn expected_schema() -> DatabaseSchema {
    DatabaseSchema {
        properties: [
            (SENDER_PROPERTY, PropertyKind::RichText),
            (RECIPIENT_PROPERTY, PropertyKind::RichText),
            (MESSAGE_PROPERTY, PropertyKind::Title),
            (TIMESTAMP_PROPERTY, PropertyKind::Number),
        ]
        .into_iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect(),
    }
}

/// Result of comparing a live database against the expected schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Expected properties that do not exist.
    pub missing: Vec<String>,
    /// `(property, expected, actual)` for properties of the wrong type.
    pub mismatched: Vec<(String, PropertyKind, PropertyKind)>,
    /// Every property name present in the database.
    pub fields: Vec<String>,
}

impl SchemaReport {
    /// Compare a live schema against `expected_schema()`.
    pub fn check(actual: &DatabaseSchema) -> Self {
        let mut report = SchemaReport {
            fields: actual.properties.keys().cloned().collect(),
            ..SchemaReport::default()
        };
        for (name, expected) in expected_schema().properties {
            match actual.properties.get(&name) {
                None => report.missing.push(name),
                Some(kind) if *kind != expected => {
                    report.mismatched.push((name, expected, kind.clone()));
                }
                Some(_) => {}
            }
        }
        report
    }

    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fields in database: {}", self.fields.join(", "))?;
        if self.is_valid() {
            return writeln!(f, "Database schema matches the message schema.");
        }
        writeln!(f, "Database schema validation failed:")?;
        if !self.missing.is_empty() {
            writeln!(f, "  Missing properties: {}", self.missing.join(", "))?;
        }
        if !self.mismatched.is_empty() {
            let rendered: Vec<String> = self
                .mismatched
                .iter()
                .map(|(name, expected, actual)| {
                    format!("{name} (expected {expected}, got {actual})")
                })
                .collect();
            writeln!(f, "  Incorrect types: {}", rendered.join(", "))?;
        }
        Ok(())
    }
}

/// Decode a page body.
pub(crate) fn decode_page(value: serde_json::Value) -> Result<PageObject, StoreError> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn properties_serialize_fixed_schema() {
        let message = Message {
            sender: "Alice".to_string(),
            recipient: "Bob".to_string(),
            body: "lunch?".to_string(),
            timestamp: Some(12.5),
        };
        let value = serde_json::to_value(MessageProperties::from(&message)).expect("json");
        assert_eq!(
            value,
            json!({
                "Sender": { "rich_text": [{ "type": "text", "text": { "content": "Alice" } }] },
                "Recipient": { "rich_text": [{ "type": "text", "text": { "content": "Bob" } }] },
                "Message": { "title": [{ "type": "text", "text": { "content": "lunch?" } }] },
                "Timestamp": { "number": 12.5 },
            })
        );
    }

    #[test]
    fn long_bodies_split_into_fragments() {
        let body = "x".repeat(MAX_FRAGMENT_CHARS * 2 + 1);
        let parts = fragments(&body);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].text.content, "x");
    }

    #[test]
    fn page_decodes_concatenated_fragments() {
        let page = decode_page(json!({
            "object": "page",
            "id": "page-1",
            "properties": {
                "Sender": { "id": "a", "type": "rich_text", "rich_text": [
                    { "plain_text": "Al" }, { "plain_text": "ice" }
                ]},
                "Recipient": { "id": "b", "type": "rich_text", "rich_text": [{ "plain_text": "Bob" }] },
                "Message": { "id": "title", "type": "title", "title": [{ "plain_text": "hi" }] },
                "Timestamp": { "id": "c", "type": "number", "number": null },
                "Tags": { "id": "d", "type": "multi_select", "multi_select": [] }
            }
        }))
        .expect("page");
        assert!(page.is_message_row());
        let stored = page.into_stored();
        assert_eq!(stored.id, "page-1");
        assert_eq!(stored.message.sender, "Alice");
        assert_eq!(stored.message.body, "hi");
        assert_eq!(stored.message.timestamp, None);
    }

    #[test]
    fn schema_report_lists_missing_and_mismatched() {
        let mut actual = expected_schema();
        actual.properties.remove("Timestamp");
        actual
            .properties
            .insert("Sender".to_string(), PropertyKind::Other("email".to_string()));
        let report = SchemaReport::check(&actual);
        assert!(!report.is_valid());
        assert_eq!(report.missing, vec!["Timestamp".to_string()]);
        assert_eq!(
            report.mismatched,
            vec![(
                "Sender".to_string(),
                PropertyKind::RichText,
                PropertyKind::Other("email".to_string())
            )]
        );
        let rendered = report.to_string();
        assert!(rendered.contains("Missing properties: Timestamp"));
        assert!(rendered.contains("Sender (expected rich_text, got email)"));
    }

    #[test]
    fn property_kind_accepts_unknown_types() {
        let kind: PropertyKind = serde_json::from_value(json!("date")).expect("kind");
        assert_eq!(kind, PropertyKind::Other("date".to_string()));
        let kind: PropertyKind = serde_json::from_value(json!("title")).expect("kind");
        assert_eq!(kind, PropertyKind::Title);
    }
}
