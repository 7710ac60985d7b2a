//! JSON file token store
//!
//! The file holds a single [`StoredCredentials`] object:
//!
//! ```json
//! {
//!   "client_id": "...",
//!   "client_secret": "...",
//!   "refresh_token": "...",
//!   "auth_token": "..."
//! }
//! ```
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! original, so a crash never leaves a half-written credential file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use smartthings_core::RefreshTokenStore;
use smartthings_domain::{AuthData, EndpointError, RefreshData, Result};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::StoredCredentials;
use crate::errors::InfraError;

/// Token store persisted as a JSON file
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Open a store backed by an existing file. The file is read lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Create (or overwrite) the file with initial credentials.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::TokenStore` if the file cannot be written.
    pub async fn create(path: impl Into<PathBuf>, refresh_data: RefreshData) -> Result<Self> {
        let store = Self::new(path);
        store.write(&refresh_data.into()).await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The most recently stored access token, if any.
    pub async fn auth_token(&self) -> Result<Option<String>> {
        Ok(self.read().await?.auth_token)
    }

    /// Sibling of the credential file with `.tmp` appended to its full name.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn read(&self) -> Result<StoredCredentials> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(InfraError::from)?;
        serde_json::from_str(&contents).map_err(|e| {
            EndpointError::TokenStore(format!(
                "invalid credential file {}: {e}",
                self.path.display()
            ))
        })
    }

    async fn write(&self, credentials: &StoredCredentials) -> Result<()> {
        let contents = serde_json::to_vec_pretty(credentials)?;
        let tmp = self.temp_path();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }
        tokio::fs::write(&tmp, contents).await.map_err(InfraError::from)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(InfraError::from)?;
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for FileTokenStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn get_refresh_data(&self) -> Result<RefreshData> {
        Ok(self.read().await?.refresh_data())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn put_auth_data(&self, data: &AuthData) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut credentials = self.read().await?;
        credentials.apply(data);
        self.write(&credentials).await?;
        debug!("Stored refreshed tokens");
        Ok(())
    }
}
