//! Vector index client used for semantic search.

pub mod error;
pub mod model;
pub mod pinecone;
pub mod provider;

/// Vector error type.
pub use error::VectorError;
/// Records, matches and embedding modes.
pub use model::{EmbedInputType, QueryMatch, VectorMetadata, VectorRecord};
/// Pinecone-backed index and its options.
pub use pinecone::{PineconeIndex, PineconeOptions};
/// Index interface.
pub use provider::VectorIndex;
