//! Test helpers shared across notemail crates.

pub mod index;
pub mod llm;
pub mod store;

pub use index::{StubIndex, flattened_match};
pub use llm::{FailingLLM, FixedLLM, FlakyLLM, RecordingLLM};
pub use store::{StubStore, stored_message};
