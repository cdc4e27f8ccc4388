//! Credential lookup.
//!
//! The sync core never stores or refreshes tokens itself. It only asks a
//! [`CredentialProvider`] whether a bearer token is present right now.

use parking_lot::RwLock;

/// Environment variable read by [`SessionCredentials::from_env`]
pub const ENV_TOKEN: &str = "MARKETSYNC_TOKEN";

/// Synchronous presence check for a bearer token
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, if the user is logged in
    fn bearer_token(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }
}

/// In-memory token holder, updated by whoever owns the login flow
#[derive(Debug, Default)]
pub struct SessionCredentials {
    token: RwLock<Option<String>>,
}

impl SessionCredentials {
    /// Create an empty (logged-out) session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let credentials = Self::new();
        credentials.set_token(Some(token.into()));
        credentials
    }

    /// Session seeded from `MARKETSYNC_TOKEN`
    pub fn from_env() -> Self {
        let credentials = Self::new();
        credentials.set_token(std::env::var(ENV_TOKEN).ok());
        credentials
    }

    /// Set the bearer token; blank tokens count as logged out
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token.filter(|t| !t.trim().is_empty());
    }

    /// Clear the token (logout)
    pub fn clear_token(&self) {
        *self.token.write() = None;
    }
}

impl CredentialProvider for SessionCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}
