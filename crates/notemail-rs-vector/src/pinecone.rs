//! Pinecone REST client.
//!
//! Embedding and index description go to the control plane; upsert and
//! query go to the index's data-plane host, resolved once on first use
//! unless configured explicitly.

use crate::error::VectorError;
use crate::model::{EmbedInputType, QueryMatch, VectorRecord};
use crate::provider::VectorIndex;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Connection options for [`PineconeIndex`].
#[derive(Clone)]
pub struct PineconeOptions {
    /// Control-plane root, e.g. `https://api.pinecone.io`.
    pub control_base: String,
    /// Data-plane host; looked up from the index description when `None`.
    pub host: Option<String>,
    pub api_key: String,
    pub index_name: String,
    pub embed_model: String,
    /// Value of the `X-Pinecone-API-Version` header.
    pub api_version: String,
    /// Maximum inputs per embed call and records per upsert call.
    pub batch_size: usize,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for PineconeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeOptions")
            .field("control_base", &self.control_base)
            .field("host", &self.host)
            .field("api_key", &"[REDACTED]")
            .field("index_name", &self.index_name)
            .field("embed_model", &self.embed_model)
            .field("api_version", &self.api_version)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

/// Vector index backed by Pinecone inference and a serverless index.
#[derive(Debug)]
pub struct PineconeIndex {
    client: Client,
    options: PineconeOptions,
    host: OnceCell<String>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    parameters: EmbedParameters,
    inputs: Vec<EmbedInput<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedParameters {
    input_type: EmbedInputType,
    truncate: &'static str,
}

#[derive(Debug, Serialize)]
struct EmbedInput<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    data: Vec<Embedding>,
}

#[derive(Debug, Deserialize)]
struct Embedding {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    #[serde(default)]
    host: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: Vec<f32>,
    top_k: usize,
    include_values: bool,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

impl PineconeIndex {
    /// Build an index client with its own HTTP client.
    pub fn new(options: PineconeOptions) -> Result<Self, VectorError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()?;
        let host = match &options.host {
            Some(host) => OnceCell::new_with(Some(with_scheme(host))),
            None => OnceCell::new(),
        };
        Ok(Self {
            client,
            options,
            host,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.options.index_name
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Api-Key", &self.options.api_key)
            .header("X-Pinecone-API-Version", &self.options.api_version)
    }

    fn control_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.options.control_base.trim_end_matches('/'),
            path
        )
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, VectorError> {
        let response = self.authorized(builder).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(
                "vector request failed (status={}, body={})",
                status, message
            );
            return Err(VectorError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Data-plane base URL, describing the index on first use.
    async fn data_plane(&self) -> Result<&str, VectorError> {
        let host = self
            .host
            .get_or_try_init(|| async {
                let url = self.control_url(&format!("indexes/{}", self.options.index_name));
                let description: IndexDescription = self.send(self.client.get(url)).await?;
                let host = description
                    .host
                    .filter(|host| !host.is_empty())
                    .ok_or_else(|| VectorError::HostUnresolved(self.options.index_name.clone()))?;
                debug!(
                    "resolved index host (index={}, host={})",
                    self.options.index_name, host
                );
                Ok::<_, VectorError>(with_scheme(&host))
            })
            .await?;
        Ok(host.as_str())
    }

    async fn embed_batch(
        &self,
        inputs: &[String],
        input_type: EmbedInputType,
    ) -> Result<Vec<Vec<f32>>, VectorError> {
        let request = EmbedRequest {
            model: &self.options.embed_model,
            parameters: EmbedParameters {
                input_type,
                truncate: "END",
            },
            inputs: inputs.iter().map(|text| EmbedInput { text }).collect(),
        };
        let response: EmbedResponse = self
            .send(self.client.post(self.control_url("embed")).json(&request))
            .await?;
        if response.data.len() != inputs.len() {
            return Err(VectorError::EmbeddingCount {
                expected: inputs.len(),
                actual: response.data.len(),
            });
        }
        Ok(response.data.into_iter().map(|item| item.values).collect())
    }
}

/// Hosts from the index description carry no scheme.
fn with_scheme(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn embed(
        &self,
        inputs: &[String],
        input_type: EmbedInputType,
    ) -> Result<Vec<Vec<f32>>, VectorError> {
        let mut vectors = Vec::with_capacity(inputs.len());
        for batch in inputs.chunks(self.options.batch_size.max(1)) {
            vectors.extend(self.embed_batch(batch, input_type).await?);
        }
        debug!(
            "embedded inputs (count={}, input_type={})",
            vectors.len(),
            input_type
        );
        Ok(vectors)
    }

    async fn upsert(
        &self,
        records: Vec<VectorRecord>,
        namespace: &str,
    ) -> Result<usize, VectorError> {
        let base = self.data_plane().await?;
        let url = format!("{base}/vectors/upsert");
        let mut upserted = 0;
        for batch in records.chunks(self.options.batch_size.max(1)) {
            let request = UpsertRequest {
                vectors: batch,
                namespace,
            };
            let response: UpsertResponse =
                self.send(self.client.post(&url).json(&request)).await?;
            upserted += response.upserted_count;
        }
        debug!("upserted vectors (namespace={namespace}, count={upserted})");
        Ok(upserted)
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<QueryMatch>, VectorError> {
        let base = self.data_plane().await?;
        let request = QueryRequest {
            namespace,
            vector,
            top_k,
            include_values: false,
            include_metadata: true,
        };
        let response: QueryResponse = self
            .send(self.client.post(format!("{base}/query")).json(&request))
            .await?;
        let mut matches = response.matches;
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::with_scheme;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_hosts_get_https() {
        assert_eq!(
            with_scheme("notion-mail-abc.svc.pinecone.io"),
            "https://notion-mail-abc.svc.pinecone.io"
        );
        assert_eq!(with_scheme("http://127.0.0.1:9/"), "http://127.0.0.1:9");
    }
}
