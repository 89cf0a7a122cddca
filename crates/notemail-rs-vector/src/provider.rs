//! Vector index abstraction.

use crate::error::VectorError;
use crate::model::{EmbedInputType, QueryMatch, VectorRecord};
use async_trait::async_trait;

#[async_trait]
/// Embedding plus nearest-neighbour index used by semantic search.
pub trait VectorIndex: Send + Sync {
    /// Embed each input; the result has one vector per input, in order.
    async fn embed(
        &self,
        inputs: &[String],
        input_type: EmbedInputType,
    ) -> Result<Vec<Vec<f32>>, VectorError>;

    /// Insert or replace records in a namespace; returns the upserted count.
    async fn upsert(&self, records: Vec<VectorRecord>, namespace: &str)
    -> Result<usize, VectorError>;

    /// Nearest neighbours of `vector`, highest score first.
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<QueryMatch>, VectorError>;

    /// Embed a single input.
    async fn embed_one(
        &self,
        input: &str,
        input_type: EmbedInputType,
    ) -> Result<Vec<f32>, VectorError> {
        let mut vectors = self.embed(&[input.to_string()], input_type).await?;
        if vectors.len() != 1 {
            return Err(VectorError::EmbeddingCount {
                expected: 1,
                actual: vectors.len(),
            });
        }
        Ok(vectors.remove(0))
    }
}
