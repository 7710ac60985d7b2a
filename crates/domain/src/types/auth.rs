//! Credential values exchanged with a token store

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tokens issued by a successful refresh.
///
/// Persisted through the token store immediately after the refresh that
/// produced them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    pub auth_token: String,
    pub refresh_token: String,
}

impl AuthData {
    pub fn new(auth_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self { auth_token: auth_token.into(), refresh_token: refresh_token.into() }
    }
}

/// Material needed to perform a refresh grant.
///
/// Loaded from the token store before every refresh attempt, so concurrent
/// refreshes always see the latest stored refresh token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshData {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl RefreshData {
    pub fn new(
        refresh_token: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

// Secrets never reach logs through Debug.
impl fmt::Debug for AuthData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthData")
            .field("auth_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for RefreshData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshData")
            .field("refresh_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
