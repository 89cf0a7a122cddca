//! Participant filter applied after retrieval.

use notemail_rs_protocol::{Identity, Participants};

/// True when `identity` is the sender or the recipient, ignoring case.
pub fn involves<P: Participants + ?Sized>(message: &P, identity: &Identity) -> bool {
    identity.matches(message.sender()) || identity.matches(message.recipient())
}
