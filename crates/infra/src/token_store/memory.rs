use async_trait::async_trait;
use smartthings_core::RefreshTokenStore;
use smartthings_domain::{AuthData, RefreshData, Result};
use tokio::sync::RwLock;
use tracing::debug;

use super::StoredCredentials;

/// Process-local token store. Credentials are lost when the process exits.
#[derive(Debug)]
pub struct InMemoryTokenStore {
    credentials: RwLock<StoredCredentials>,
}

impl InMemoryTokenStore {
    pub fn new(refresh_data: RefreshData) -> Self {
        Self { credentials: RwLock::new(refresh_data.into()) }
    }

    /// The most recently stored access token.
    pub async fn auth_token(&self) -> Option<String> {
        self.credentials.read().await.auth_token.clone()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryTokenStore {
    async fn get_refresh_data(&self) -> Result<RefreshData> {
        Ok(self.credentials.read().await.refresh_data())
    }

    async fn put_auth_data(&self, data: &AuthData) -> Result<()> {
        self.credentials.write().await.apply(data);
        debug!("Stored refreshed tokens in memory");
        Ok(())
    }
}
