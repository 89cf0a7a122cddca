//! Semantic search through the vector index.
//!
//! The query is embedded in query mode and the index is over-fetched by
//! `overfetch_factor`, since the participant filter runs client-side on the
//! flattened text stored with each vector. Scanning stops as soon as
//! `top_k` neighbours are accepted.

use crate::filter::involves;
use crate::render::write_separator;
use log::{debug, warn};
use notemail_rs_protocol::{FlattenedText, Identity, RetrievedResult};
use notemail_rs_vector::{EmbedInputType, VectorIndex};
use std::fmt;

/// Tuning for semantic search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticSettings {
    pub namespace: String,
    pub top_k: usize,
    pub overfetch_factor: usize,
}

impl Default for SemanticSettings {
    fn default() -> Self {
        Self {
            namespace: "notion_mail".to_string(),
            top_k: 3,
            overfetch_factor: 3,
        }
    }
}

/// Outcome of a semantic search.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticOutcome {
    /// No vector index is configured.
    Unavailable,
    /// Embedding or querying failed, or no identity was given.
    Failed(String),
    /// No neighbour involved the identity.
    NoMatches { query: String, identity: Identity },
    /// Accepted neighbours, highest score first.
    Found {
        query: String,
        results: Vec<RetrievedResult>,
    },
}

impl SemanticOutcome {
    pub fn results(&self) -> &[RetrievedResult] {
        match self {
            SemanticOutcome::Found { results, .. } => results,
            _ => &[],
        }
    }
}

/// Nearest messages to `query` that involve `identity`.
pub async fn semantic_search(
    index: Option<&dyn VectorIndex>,
    query: &str,
    identity: &str,
    settings: &SemanticSettings,
) -> SemanticOutcome {
    let Some(index) = index else {
        return SemanticOutcome::Unavailable;
    };
    let Some(identity) = Identity::parse(identity) else {
        return SemanticOutcome::Failed(
            "You must provide a username to perform semantic search.".to_string(),
        );
    };

    let vector = match index.embed_one(query, EmbedInputType::Query).await {
        Ok(vector) => vector,
        Err(err) => {
            warn!("semantic search embedding failed (error={err})");
            return SemanticOutcome::Failed(err.to_string());
        }
    };
    let fetch = settings.top_k.saturating_mul(settings.overfetch_factor);
    let matches = match index.query(vector, fetch, &settings.namespace).await {
        Ok(matches) => matches,
        Err(err) => {
            warn!("semantic search query failed (error={err})");
            return SemanticOutcome::Failed(err.to_string());
        }
    };

    let candidates = matches.len();
    let mut results = Vec::new();
    for neighbour in matches {
        let Some(parsed) = FlattenedText::from_raw(neighbour.text()).parse() else {
            continue;
        };
        if !involves(&parsed, &identity) {
            continue;
        }
        results.push(RetrievedResult {
            source_id: neighbour.id,
            sender: parsed.sender,
            recipient: parsed.recipient,
            body: parsed.body,
            timestamp: None,
            score: Some(neighbour.score),
        });
        if results.len() >= settings.top_k {
            break;
        }
    }
    debug!(
        "semantic search complete (fetched={}, candidates={}, accepted={})",
        fetch,
        candidates,
        results.len()
    );

    let query = query.to_string();
    if results.is_empty() {
        return SemanticOutcome::NoMatches { query, identity };
    }
    SemanticOutcome::Found { query, results }
}

impl fmt::Display for SemanticOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticOutcome::Unavailable => writeln!(
                f,
                "Error: semantic search is unavailable (vector index not configured)."
            ),
            SemanticOutcome::Failed(reason) => {
                writeln!(f, "Error performing semantic search: {reason}")
            }
            SemanticOutcome::NoMatches { query, identity } => {
                writeln!(f, "Semantic search results for '{query}':")?;
                writeln!(f, "No matching messages found for user '{identity}'.")
            }
            SemanticOutcome::Found { query, results } => {
                writeln!(f, "Semantic search results for '{query}':")?;
                for result in results {
                    writeln!(f)?;
                    writeln!(f, "Score: {:.4}", result.score.unwrap_or_default())?;
                    writeln!(f, "From: {}", result.sender)?;
                    writeln!(f, "To: {}", result.recipient)?;
                    writeln!(f, "{}", result.body)?;
                    write_separator(f)?;
                }
                Ok(())
            }
        }
    }
}
