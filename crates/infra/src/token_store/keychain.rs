//! Platform keychain token store
//!
//! Credentials are kept as separate keychain entries per account:
//! - `client.<account>`: JSON `{client_id, client_secret}`
//! - `refresh.<account>`: refresh token
//! - `access.<account>`: last access token
//!
//! `keyring` calls block, so they run on the blocking thread pool.

use async_trait::async_trait;
use keyring::{Entry, Error as KeyringError};
use serde::{Deserialize, Serialize};
use smartthings_core::RefreshTokenStore;
use smartthings_domain::{AuthData, EndpointError, RefreshData, Result};
use tracing::debug;

use crate::errors::InfraError;

const CLIENT_PREFIX: &str = "client.";
const REFRESH_PREFIX: &str = "refresh.";
const ACCESS_PREFIX: &str = "access.";

#[derive(Serialize, Deserialize)]
struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

/// Token store backed by the OS keychain (macOS Keychain, Windows Credential
/// Manager, Linux Secret Service)
#[derive(Debug, Clone)]
pub struct KeychainTokenStore {
    service: String,
    account: String,
}

impl KeychainTokenStore {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self { service: service.into(), account: account.into() }
    }

    /// Write the initial credentials for this account.
    pub async fn initialize(&self, refresh_data: RefreshData) -> Result<()> {
        let client = serde_json::to_string(&ClientCredentials {
            client_id: refresh_data.client_id,
            client_secret: refresh_data.client_secret,
        })?;
        self.set(CLIENT_PREFIX, client).await?;
        self.set(REFRESH_PREFIX, refresh_data.refresh_token).await
    }

    /// The most recently stored access token, if any.
    pub async fn auth_token(&self) -> Result<Option<String>> {
        self.get(ACCESS_PREFIX).await
    }

    /// Remove every entry for this account. Missing entries are skipped;
    /// any other keychain failure is returned.
    pub async fn clear(&self) -> Result<()> {
        for prefix in [CLIENT_PREFIX, REFRESH_PREFIX, ACCESS_PREFIX] {
            self.delete(prefix).await?;
        }
        Ok(())
    }

    fn key(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.account)
    }

    async fn get(&self, prefix: &str) -> Result<Option<String>> {
        let (service, key) = (self.service.clone(), self.key(prefix));
        run_blocking(move || missing_as_none(Entry::new(&service, &key)?.get_password())).await
    }

    async fn require(&self, prefix: &str) -> Result<String> {
        self.get(prefix).await?.ok_or_else(|| {
            EndpointError::TokenStore(format!("keychain entry not found: {}", self.key(prefix)))
        })
    }

    async fn set(&self, prefix: &str, value: String) -> Result<()> {
        let (service, key) = (self.service.clone(), self.key(prefix));
        run_blocking(move || Entry::new(&service, &key)?.set_password(&value)).await
    }

    async fn delete(&self, prefix: &str) -> Result<()> {
        let (service, key) = (self.service.clone(), self.key(prefix));
        run_blocking(move || {
            missing_as_none(Entry::new(&service, &key)?.delete_credential()).map(|_| ())
        })
        .await
    }
}

/// `NoEntry` becomes `None`; every other keyring error is kept.
fn missing_as_none<T>(result: keyring::Result<T>) -> keyring::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(err) => Err(err),
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> keyring::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| EndpointError::TokenStore(format!("keychain task failed: {e}")))?
        .map_err(|e| InfraError::from(e).into())
}

#[async_trait]
impl RefreshTokenStore for KeychainTokenStore {
    async fn get_refresh_data(&self) -> Result<RefreshData> {
        let client: ClientCredentials = serde_json::from_str(&self.require(CLIENT_PREFIX).await?)?;
        let refresh_token = self.require(REFRESH_PREFIX).await?;
        Ok(RefreshData::new(refresh_token, client.client_id, client.client_secret))
    }

    async fn put_auth_data(&self, data: &AuthData) -> Result<()> {
        self.set(REFRESH_PREFIX, data.refresh_token.clone()).await?;
        self.set(ACCESS_PREFIX, data.auth_token.clone()).await?;
        debug!(account = %self.account, "Stored refreshed tokens in keychain");
        Ok(())
    }
}
