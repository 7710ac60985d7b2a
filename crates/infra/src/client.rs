//! Client assembly
//!
//! Wires settings, an authenticator and a transport into an
//! [`EndpointClient`].

use std::sync::Arc;

use smartthings_core::{
    Authenticator, BearerTokenAuthenticator, EndpointClient, EndpointClientConfig, HttpTransport,
    NoOpAuthenticator, RefreshTokenAuthenticator, RefreshTokenStore,
};
use smartthings_domain::{ClientSettings, HeadersExt, HttpHeaders, Result};
use tracing::debug;

use crate::http::ReqwestTransport;

const DEFAULT_USER_AGENT: &str = concat!("smartthings-rs/", env!("CARGO_PKG_VERSION"));

enum Credentials {
    None,
    Bearer(String),
    Refreshing { token: String, store: Arc<dyn RefreshTokenStore> },
    Custom(Arc<dyn Authenticator>),
}

/// Builder for [`EndpointClient`]
pub struct EndpointClientBuilder {
    base_path: String,
    settings: Option<ClientSettings>,
    credentials: Credentials,
    refresh_mutex: bool,
    transport: Option<Arc<dyn HttpTransport>>,
    user_agent: Option<String>,
    headers: HttpHeaders,
}

impl EndpointClientBuilder {
    /// Start a builder for endpoints under `base_path` (for example
    /// `"devices"`).
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            settings: None,
            credentials: Credentials::None,
            refresh_mutex: true,
            transport: None,
            user_agent: None,
            headers: HttpHeaders::new(),
        }
    }

    /// Set the settings; defaults to production URLs.
    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Authenticate with a fixed bearer token.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Credentials::Bearer(token.into());
        self
    }

    /// Authenticate with an access token renewed from `store` on 401.
    pub fn refresh_token(mut self, token: impl Into<String>, store: Arc<dyn RefreshTokenStore>) -> Self {
        self.credentials = Credentials::Refreshing { token: token.into(), store };
        self
    }

    /// Use a caller-supplied authenticator.
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.credentials = Credentials::Custom(authenticator);
        self
    }

    /// Serialize concurrent refreshes (default `true`). Only affects
    /// [`refresh_token`](Self::refresh_token) credentials.
    pub fn refresh_mutex(mut self, enabled: bool) -> Self {
        self.refresh_mutex = enabled;
        self
    }

    /// Use a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Add a default header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set_header(name, value);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns an error if the reqwest client cannot be created.
    pub fn build(self) -> Result<EndpointClient> {
        let settings = self.settings.unwrap_or_default();

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = ReqwestTransport::builder()
                    .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()));
                if let Some(timeout) = settings.timeout() {
                    builder = builder.timeout(timeout);
                }
                Arc::new(builder.build()?)
            }
        };

        let authenticator: Arc<dyn Authenticator> = match self.credentials {
            Credentials::None => Arc::new(NoOpAuthenticator),
            Credentials::Bearer(token) => Arc::new(BearerTokenAuthenticator::new(token)),
            Credentials::Refreshing { token, store } => Arc::new(
                RefreshTokenAuthenticator::new(token, store, Arc::clone(&transport))
                    .with_refresh_mutex(self.refresh_mutex),
            ),
            Credentials::Custom(authenticator) => authenticator,
        };

        let mut config = EndpointClientConfig::from_settings(authenticator, &settings);
        if !self.headers.is_empty() {
            config = config.with_headers(self.headers);
        }

        debug!(base_path = %self.base_path, base_url = %settings.base_url, "Built endpoint client");
        Ok(EndpointClient::new(self.base_path, config, transport))
    }
}

#[cfg(test)]
mod tests {
    use smartthings_core::testing::{MemoryTokenStore, ScriptedTransport};
    use smartthings_core::HttpResponse;
    use smartthings_domain::{HttpMethod, RefreshData};

    use super::*;

    fn scripted() -> Arc<ScriptedTransport> {
        Arc::new(ScriptedTransport::new(|_| Ok(HttpResponse::new(200, "{}"))))
    }

    #[tokio::test]
    async fn bearer_credentials_and_default_headers() {
        let transport = scripted();
        let client = EndpointClientBuilder::new("devices")
            .bearer_token("tok")
            .header("X-Extra", "1")
            .transport(transport.clone())
            .build()
            .unwrap();

        client.request(HttpMethod::Get, None, None, None, None).await.unwrap();

        let sent = &transport.requests().await[0];
        assert_eq!(sent.url, "https://api.smartthings.com/devices");
        assert_eq!(sent.header("Authorization"), Some("Bearer tok"));
        assert_eq!(sent.header("X-Extra"), Some("1"));
    }

    #[tokio::test]
    async fn settings_flow_into_config() {
        let settings = ClientSettings {
            base_url: "https://api.test/".to_string(),
            api_version: Some("20170916".to_string()),
            location_id: Some("loc-1".to_string()),
            ..Default::default()
        };
        let client =
            EndpointClientBuilder::new("rules").settings(settings).transport(scripted()).build().unwrap();

        assert_eq!(client.url(None).unwrap(), "https://api.test/rules");
        assert_eq!(client.config().version.as_deref(), Some("20170916"));
        assert_eq!(client.config().location_id.as_deref(), Some("loc-1"));
    }

    #[tokio::test]
    async fn no_credentials_sends_no_authorization() {
        let transport = scripted();
        let client = EndpointClientBuilder::new("devices").transport(transport.clone()).build().unwrap();

        client.request(HttpMethod::Get, None, None, None, None).await.unwrap();
        assert_eq!(transport.requests().await[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn refresh_credentials_share_the_transport() {
        let store = Arc::new(MemoryTokenStore::new(RefreshData::new("r", "id", "secret")));
        let client = EndpointClientBuilder::new("devices")
            .refresh_token("access-1", store)
            .transport(scripted())
            .build()
            .unwrap();

        assert_eq!(client.config().authenticator.authenticate_generic().await.unwrap(), "access-1");
        assert!(client.config().authenticator.acquire_refresh_mutex().await.is_some());
    }

    #[tokio::test]
    async fn refresh_mutex_can_be_disabled() {
        let store = Arc::new(MemoryTokenStore::new(RefreshData::new("r", "id", "secret")));
        let client = EndpointClientBuilder::new("devices")
            .refresh_token("access-1", store)
            .refresh_mutex(false)
            .transport(scripted())
            .build()
            .unwrap();

        assert!(client.config().authenticator.acquire_refresh_mutex().await.is_none());
    }

    #[test]
    fn builds_reqwest_transport_by_default() {
        let settings = ClientSettings { timeout_secs: Some(10), ..Default::default() };
        let client = EndpointClientBuilder::new("devices").settings(settings).build();
        assert!(client.is_ok());
    }
}
