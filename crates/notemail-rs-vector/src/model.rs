//! Data exchanged with the vector index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asymmetric embedding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedInputType {
    /// Stored content, embedded at write time.
    Passage,
    /// Search phrases, embedded at query time.
    Query,
}

impl fmt::Display for EmbedInputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedInputType::Passage => f.write_str("passage"),
            EmbedInputType::Query => f.write_str("query"),
        }
    }
}

/// Metadata stored next to every vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorMetadata {
    /// Flattened message text.
    #[serde(default)]
    pub text: String,
}

/// A vector to upsert, keyed by the store identifier of its message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: VectorMetadata,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, values: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values,
            metadata: VectorMetadata { text: text.into() },
        }
    }
}

/// A nearest-neighbour hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<VectorMetadata>,
}

impl QueryMatch {
    /// Flattened text carried in the metadata; empty when absent.
    pub fn text(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|metadata| metadata.text.as_str())
            .unwrap_or_default()
    }
}
