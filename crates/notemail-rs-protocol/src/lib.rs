//! Shared domain types for notemail: identities, messages and search results.
//!
//! Every other crate in the workspace speaks in these types. The store and
//! vector crates translate them to and from their wire formats; the core
//! crate filters and renders them.

mod flatten;
mod identity;
mod message;

pub use flatten::{FlattenedText, ParsedText};
pub use identity::Identity;
pub use message::{Message, Participants, RetrievedResult, StoredMessage, format_timestamp};

/// Identifier assigned by the document store to a message row.
pub type MessageId = String;
