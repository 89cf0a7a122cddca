//! Store-side query filters.

use crate::schema::{MESSAGE_PROPERTY, RECIPIENT_PROPERTY, SENDER_PROPERTY};
use serde_json::{Value, json};

/// Filters the store can evaluate server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFilter {
    /// Every message in the collection.
    All,
    /// Recipient field equals the value exactly.
    RecipientEquals(String),
    /// Sender, recipient or body contains the term.
    ContainsAny(String),
}

impl MessageFilter {
    /// Render as a database query filter; `None` means no filter.
    pub fn to_query_filter(&self) -> Option<Value> {
        match self {
            MessageFilter::All => None,
            MessageFilter::RecipientEquals(identity) => Some(json!({
                "property": RECIPIENT_PROPERTY,
                "rich_text": { "equals": identity },
            })),
            MessageFilter::ContainsAny(term) => Some(json!({
                "or": [
                    { "property": SENDER_PROPERTY, "rich_text": { "contains": term } },
                    { "property": RECIPIENT_PROPERTY, "rich_text": { "contains": term } },
                    { "property": MESSAGE_PROPERTY, "title": { "contains": term } },
                ]
            })),
        }
    }
}
