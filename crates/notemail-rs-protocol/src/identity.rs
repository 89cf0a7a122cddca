//! Free-text participant identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name identifying a mail participant.
///
/// There is no registry behind an identity: any non-empty name is accepted
/// and two identities are equal when their lowercase forms are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Parse a user-supplied name, trimming whitespace. Empty names are rejected.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self(name.to_string()))
    }

    /// Name as entered by the user.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a stored participant field.
    pub fn matches(&self, participant: &str) -> bool {
        self.0.to_lowercase() == participant.to_lowercase()
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for Identity {}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
