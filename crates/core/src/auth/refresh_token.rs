//! Bearer authenticator renewed through the OAuth refresh grant

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use smartthings_domain::constants::{
    GRANT_TYPE_REFRESH_TOKEN, HEADER_ACCEPT, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE,
    MEDIA_TYPE_FORM, MEDIA_TYPE_JSON,
};
use smartthings_domain::{AuthData, EndpointError, HeadersExt, HttpHeaders, HttpMethod, Result};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::bearer_value;
use super::ports::{Authenticator, RefreshGuard, RefreshTokenStore};
use crate::endpoint::EndpointClientConfig;
use crate::transport::{HttpRequest, HttpTransport, RequestBody};

/// Success payload of the token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Bearer authenticator that renews its access token on demand.
///
/// The refresh token and client credentials are loaded from the
/// [`RefreshTokenStore`] before every refresh, and the new tokens are written
/// back after a successful one. Refreshes are serialized through an internal
/// tokio mutex unless disabled with [`with_refresh_mutex`].
///
/// [`with_refresh_mutex`]: RefreshTokenAuthenticator::with_refresh_mutex
pub struct RefreshTokenAuthenticator {
    token: RwLock<String>,
    token_store: Arc<dyn RefreshTokenStore>,
    transport: Arc<dyn HttpTransport>,
    refresh_lock: Option<Arc<Mutex<()>>>,
}

impl RefreshTokenAuthenticator {
    pub fn new(
        token: impl Into<String>,
        token_store: Arc<dyn RefreshTokenStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            token: RwLock::new(token.into()),
            token_store,
            transport,
            refresh_lock: Some(Arc::new(Mutex::new(()))),
        }
    }

    /// Enable or disable refresh serialization (enabled by default).
    ///
    /// With the mutex disabled, concurrent 401s each perform their own
    /// refresh round trip.
    pub fn with_refresh_mutex(mut self, enabled: bool) -> Self {
        self.refresh_lock = if enabled { Some(Arc::new(Mutex::new(()))) } else { None };
        self
    }

    /// The access token currently in use.
    pub async fn current_token(&self) -> String {
        self.token.read().await.clone()
    }

    fn basic_credentials(client_id: &str, client_secret: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{client_id}:{client_secret}")))
    }
}

impl fmt::Debug for RefreshTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTokenAuthenticator")
            .field("token", &"[REDACTED]")
            .field("refresh_mutex", &self.refresh_lock.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for RefreshTokenAuthenticator {
    async fn authenticate(&self, mut headers: HttpHeaders) -> Result<HttpHeaders> {
        let token = self.token.read().await;
        headers.set_header(HEADER_AUTHORIZATION, bearer_value(&token));
        Ok(headers)
    }

    async fn authenticate_generic(&self) -> Result<String> {
        Ok(self.current_token().await)
    }

    #[instrument(skip_all)]
    async fn refresh(&self, headers: &mut HttpHeaders, config: &EndpointClientConfig) -> Result<()> {
        let url_provider = config.url_provider.as_ref().ok_or_else(|| {
            EndpointError::Configuration("No URL provider specified".to_string())
        })?;

        if self.refresh_lock.is_some() {
            let current = bearer_value(&self.token.read().await);
            let stale = headers.get_header(HEADER_AUTHORIZATION).is_some_and(|sent| sent != current);
            if stale {
                debug!("Token already refreshed by a concurrent request");
                headers.set_header(HEADER_AUTHORIZATION, current);
                return Ok(());
            }
        }

        let refresh_data = self.token_store.get_refresh_data().await?;

        let request = HttpRequest::new(HttpMethod::Post, url_provider.auth_url.clone())
            .with_header(HEADER_CONTENT_TYPE, MEDIA_TYPE_FORM)
            .with_header(
                HEADER_AUTHORIZATION,
                Self::basic_credentials(&refresh_data.client_id, &refresh_data.client_secret),
            )
            .with_header(HEADER_ACCEPT, MEDIA_TYPE_JSON)
            .with_body(Some(RequestBody::Form(vec![
                ("grant_type".to_string(), GRANT_TYPE_REFRESH_TOKEN.to_string()),
                ("client_id".to_string(), refresh_data.client_id.clone()),
                ("refresh_token".to_string(), refresh_data.refresh_token.clone()),
            ])));

        debug!(auth_url = %url_provider.auth_url, "Requesting token refresh");
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            warn!(status = response.status, "Token refresh rejected");
            return Err(EndpointError::AuthRefresh {
                status: response.status,
                body: response.body_value(),
            });
        }

        let tokens: TokenResponse = serde_json::from_value(response.json_body()?)?;
        let auth_data = AuthData::new(
            tokens.access_token,
            tokens.refresh_token.unwrap_or(refresh_data.refresh_token),
        );

        {
            let mut token = self.token.write().await;
            *token = auth_data.auth_token.clone();
            headers.set_header(HEADER_AUTHORIZATION, bearer_value(&token));
        }

        self.token_store.put_auth_data(&auth_data).await?;
        info!("Access token refreshed");
        Ok(())
    }

    async fn acquire_refresh_mutex(&self) -> Option<RefreshGuard> {
        let lock = Arc::clone(self.refresh_lock.as_ref()?);
        Some(RefreshGuard::from_mutex_guard(lock.lock_owned().await))
    }
}
