//! Message persistence on top of a hosted document database.

pub mod error;
pub mod filter;
pub mod notion;
pub mod provider;
pub mod schema;
pub mod stats;

/// Store error type.
pub use error::StoreError;
/// Query filters understood by every store.
pub use filter::MessageFilter;
/// Notion-backed store and its connection options.
pub use notion::{NotionStore, NotionStoreOptions};
/// Store interface.
pub use provider::MessageStore;
/// Property schema and database schema validation.
pub use schema::{DatabaseSchema, PropertyKind, SchemaReport, expected_schema};
/// Per-participant message counts.
pub use stats::MailboxStats;
