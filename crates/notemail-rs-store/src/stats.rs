//! Per-participant message counts.

use notemail_rs_protocol::{Participants, StoredMessage};
use std::collections::HashMap;
use std::fmt;

/// Totals and per-person counts over a set of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxStats {
    pub total: usize,
    /// `(sender, count)` ordered by count descending, then name.
    pub senders: Vec<(String, usize)>,
    /// `(recipient, count)` ordered by count descending, then name.
    pub recipients: Vec<(String, usize)>,
}

impl MailboxStats {
    pub fn from_messages(messages: &[StoredMessage]) -> Self {
        let mut senders: HashMap<&str, usize> = HashMap::new();
        let mut recipients: HashMap<&str, usize> = HashMap::new();
        for message in messages {
            if !message.sender().is_empty() {
                *senders.entry(message.sender()).or_default() += 1;
            }
            if !message.recipient().is_empty() {
                *recipients.entry(message.recipient()).or_default() += 1;
            }
        }
        Self {
            total: messages.len(),
            senders: ranked(senders),
            recipients: ranked(recipients),
        }
    }
}

fn ranked(counts: HashMap<&str, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

impl fmt::Display for MailboxStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total messages: {}", self.total)?;
        writeln!(f, "Unique senders: {}", self.senders.len())?;
        writeln!(f, "Unique recipients: {}", self.recipients.len())?;
        writeln!(f)?;
        writeln!(f, "Messages sent by each user:")?;
        for (name, count) in &self.senders {
            writeln!(f, "  {name}: {count}")?;
        }
        writeln!(f)?;
        writeln!(f, "Messages received by each user:")?;
        for (name, count) in &self.recipients {
            writeln!(f, "  {name}: {count}")?;
        }
        Ok(())
    }
}
