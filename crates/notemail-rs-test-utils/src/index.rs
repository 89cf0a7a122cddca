use async_trait::async_trait;
use notemail_rs_protocol::FlattenedText;
use notemail_rs_vector::{
    EmbedInputType, QueryMatch, VectorError, VectorIndex, VectorMetadata, VectorRecord,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// A query match whose metadata holds the flattened form of a message.
pub fn flattened_match(
    id: &str,
    score: f32,
    sender: &str,
    recipient: &str,
    body: &str,
) -> QueryMatch {
    QueryMatch {
        id: id.to_string(),
        score,
        metadata: Some(VectorMetadata {
            text: FlattenedText::new(sender, recipient, body).into_string(),
        }),
    }
}

/// Vector index returning scripted matches and recording every call.
#[derive(Clone, Default)]
pub struct StubIndex {
    matches: Vec<QueryMatch>,
    fail_embed: bool,
    fail_upsert: bool,
    fail_query: bool,
    embed_calls: Arc<Mutex<Vec<(Vec<String>, EmbedInputType)>>>,
    upserts: Arc<Mutex<Vec<(String, Vec<VectorRecord>)>>>,
    queries: Arc<Mutex<Vec<(usize, String)>>>,
}

impl StubIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches returned by `query`, already ordered by score.
    pub fn with_matches(matches: Vec<QueryMatch>) -> Self {
        Self {
            matches,
            ..Self::default()
        }
    }

    pub fn failing_embed(mut self) -> Self {
        self.fail_embed = true;
        self
    }

    pub fn failing_upsert(mut self) -> Self {
        self.fail_upsert = true;
        self
    }

    pub fn failing_query(mut self) -> Self {
        self.fail_query = true;
        self
    }

    pub fn embed_calls(&self) -> Vec<(Vec<String>, EmbedInputType)> {
        self.embed_calls.lock().clone()
    }

    /// `(namespace, records)` per upsert call.
    pub fn upserts(&self) -> Vec<(String, Vec<VectorRecord>)> {
        self.upserts.lock().clone()
    }

    /// `(top_k, namespace)` per query call.
    pub fn queries(&self) -> Vec<(usize, String)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl VectorIndex for StubIndex {
    async fn embed(
        &self,
        inputs: &[String],
        input_type: EmbedInputType,
    ) -> Result<Vec<Vec<f32>>, VectorError> {
        self.embed_calls.lock().push((inputs.to_vec(), input_type));
        if self.fail_embed {
            return Err(VectorError::Api {
                status: 500,
                message: "embedding service down".to_string(),
            });
        }
        Ok(inputs
            .iter()
            .map(|input| vec![input.len() as f32, 1.0])
            .collect())
    }

    async fn upsert(
        &self,
        records: Vec<VectorRecord>,
        namespace: &str,
    ) -> Result<usize, VectorError> {
        if self.fail_upsert {
            return Err(VectorError::Api {
                status: 500,
                message: "index write rejected".to_string(),
            });
        }
        let count = records.len();
        self.upserts.lock().push((namespace.to_string(), records));
        Ok(count)
    }

    async fn query(
        &self,
        _vector: Vec<f32>,
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<QueryMatch>, VectorError> {
        self.queries.lock().push((top_k, namespace.to_string()));
        if self.fail_query {
            return Err(VectorError::Api {
                status: 502,
                message: "query timed out upstream".to_string(),
            });
        }
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }
}
