//! Keyword search over the document store.

use crate::filter::involves;
use crate::render::write_separator;
use log::{debug, warn};
use notemail_rs_protocol::{Identity, RetrievedResult, format_timestamp};
use notemail_rs_store::MessageStore;
use std::fmt;

/// Outcome of a keyword search.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordOutcome {
    /// The store had no message containing the term.
    NoMatches { term: String },
    /// Messages contained the term but none involve the identity.
    NoneForIdentity {
        term: String,
        identity: Identity,
        total: usize,
    },
    /// Matching messages involving the identity, oldest first.
    Found {
        term: String,
        total: usize,
        results: Vec<RetrievedResult>,
    },
    /// The store query failed.
    Failed { term: String, reason: String },
}

impl KeywordOutcome {
    /// Results shown to the user; empty for every outcome but `Found`.
    pub fn results(&self) -> &[RetrievedResult] {
        match self {
            KeywordOutcome::Found { results, .. } => results,
            _ => &[],
        }
    }
}

/// Substring search across sender, recipient and body, restricted to
/// messages the identity takes part in.
pub async fn keyword_search(
    store: &dyn MessageStore,
    term: &str,
    identity: &Identity,
) -> KeywordOutcome {
    let term = term.to_string();
    let mut candidates = match store.query_by_substring(&term).await {
        Ok(candidates) => candidates,
        Err(err) => {
            warn!("keyword search failed (term={term}, error={err})");
            return KeywordOutcome::Failed {
                term,
                reason: err.to_string(),
            };
        }
    };
    if candidates.is_empty() {
        return KeywordOutcome::NoMatches { term };
    }

    candidates.sort_by(|a, b| a.message.sort_key().total_cmp(&b.message.sort_key()));
    let total = candidates.len();
    let results: Vec<RetrievedResult> = candidates
        .into_iter()
        .filter(|candidate| involves(candidate, identity))
        .map(RetrievedResult::from)
        .collect();
    debug!(
        "keyword search complete (term={}, candidates={}, shown={})",
        term,
        total,
        results.len()
    );

    if results.is_empty() {
        return KeywordOutcome::NoneForIdentity {
            term,
            identity: identity.clone(),
            total,
        };
    }
    KeywordOutcome::Found {
        term,
        total,
        results,
    }
}

impl fmt::Display for KeywordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordOutcome::NoMatches { term } => {
                writeln!(f, "No messages found containing '{term}'.")
            }
            KeywordOutcome::NoneForIdentity {
                term,
                identity,
                total,
            } => {
                writeln!(f, "Search results for '{term}' ({total} messages):")?;
                writeln!(f)?;
                writeln!(f, "No messages found containing '{term}' for user {identity}.")
            }
            KeywordOutcome::Found {
                term,
                total,
                results,
            } => {
                writeln!(f, "Search results for '{term}' ({total} messages):")?;
                writeln!(f)?;
                for result in results {
                    writeln!(f, "[{}]", format_timestamp(result.timestamp))?;
                    writeln!(f, "From: {}", result.sender)?;
                    writeln!(f, "To:   {}", result.recipient)?;
                    writeln!(f, "{}", result.body)?;
                    write_separator(f)?;
                }
                Ok(())
            }
            KeywordOutcome::Failed { term, reason } => {
                writeln!(f, "Error searching messages for '{term}': {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_matches_renders_term() {
        let outcome = KeywordOutcome::NoMatches {
            term: "lunch".to_string(),
        };
        assert_eq!(outcome.to_string(), "No messages found containing 'lunch'.\n");
        assert!(outcome.results().is_empty());
    }

    #[test]
    fn found_renders_each_result() {
        let outcome = KeywordOutcome::Found {
            term: "lunch".to_string(),
            total: 2,
            results: vec![RetrievedResult {
                source_id: "p1".to_string(),
                sender: "Alice".to_string(),
                recipient: "Bob".to_string(),
                body: "lunch?".to_string(),
                timestamp: None,
                score: None,
            }],
        };
        let rendered = outcome.to_string();
        assert!(rendered.starts_with("Search results for 'lunch' (2 messages):\n\n[]\n"));
        assert!(rendered.contains("From: Alice\nTo:   Bob\nlunch?\n"));
        assert!(rendered.ends_with(&format!("{}\n", "-".repeat(40))));
    }
}
