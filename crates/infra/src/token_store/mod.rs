//! Refresh token store adapters
//!
//! Implementations of [`smartthings_core::RefreshTokenStore`]. Every store
//! rotates the stored refresh token when new auth data is written.

pub mod file;
#[cfg(feature = "keychain")]
pub mod keychain;
pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};
use smartthings_domain::{AuthData, RefreshData};

pub use file::FileTokenStore;
#[cfg(feature = "keychain")]
pub use keychain::KeychainTokenStore;
pub use memory::InMemoryTokenStore;

/// Persisted credential set
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Last access token issued, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl StoredCredentials {
    pub fn refresh_data(&self) -> RefreshData {
        RefreshData::new(&self.refresh_token, &self.client_id, &self.client_secret)
    }

    /// Record a refresh result.
    pub fn apply(&mut self, data: &AuthData) {
        self.refresh_token.clone_from(&data.refresh_token);
        self.auth_token = Some(data.auth_token.clone());
    }
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl From<RefreshData> for StoredCredentials {
    fn from(data: RefreshData) -> Self {
        Self {
            client_id: data.client_id,
            client_secret: data.client_secret,
            refresh_token: data.refresh_token,
            auth_token: None,
        }
    }
}
