//! Login state of an interactive session.
//!
//! The only mutable state a session carries is the current identity.
//! Logging in accepts any non-empty name; there is no password check.

use log::info;
use notemail_rs_protocol::Identity;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Identity>,
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn(Identity),
    /// Someone is already logged in; nothing changed.
    AlreadyLoggedIn(Identity),
    /// The name was empty after trimming.
    Rejected,
}

/// Result of a logout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    LoggedOut(Identity),
    NotLoggedIn,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn login(&mut self, name: &str) -> LoginOutcome {
        if let Some(current) = &self.identity {
            return LoginOutcome::AlreadyLoggedIn(current.clone());
        }
        match Identity::parse(name) {
            Some(identity) => {
                info!("session login (identity={identity})");
                self.identity = Some(identity.clone());
                LoginOutcome::LoggedIn(identity)
            }
            None => LoginOutcome::Rejected,
        }
    }

    pub fn logout(&mut self) -> LogoutOutcome {
        match self.identity.take() {
            Some(identity) => {
                info!("session logout (identity={identity})");
                LogoutOutcome::LoggedOut(identity)
            }
            None => LogoutOutcome::NotLoggedIn,
        }
    }
}

impl fmt::Display for LoginOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginOutcome::LoggedIn(identity) => {
                write!(f, "Welcome {identity}! (password bypassed)")
            }
            LoginOutcome::AlreadyLoggedIn(identity) => {
                write!(f, "Already logged in as {identity}.")
            }
            LoginOutcome::Rejected => f.write_str("Invalid username. Please try again."),
        }
    }
}

impl fmt::Display for LogoutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoutOutcome::LoggedOut(identity) => write!(f, "Goodbye {identity}!"),
            LogoutOutcome::NotLoggedIn => f.write_str("No user is currently logged in."),
        }
    }
}
