use std::fmt;
use std::sync::Arc;

use smartthings_domain::{ClientSettings, HttpHeaders, UrlProvider};

use crate::auth::Authenticator;

/// Settings shared by every request of one client session
#[derive(Clone)]
pub struct EndpointClientConfig {
    pub authenticator: Arc<dyn Authenticator>,
    /// Required to build URLs and to refresh tokens
    pub url_provider: Option<UrlProvider>,
    /// Sent as `X-ST-CORRELATION`
    pub logging_id: Option<String>,
    /// API version for the vendor `Accept` media type
    pub version: Option<String>,
    /// Default headers copied into every request
    pub headers: Option<HttpHeaders>,
    pub location_id: Option<String>,
    pub installed_app_id: Option<String>,
}

impl EndpointClientConfig {
    pub fn new(authenticator: impl Authenticator + 'static) -> Self {
        Self::with_shared_authenticator(Arc::new(authenticator))
    }

    pub fn with_shared_authenticator(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            url_provider: None,
            logging_id: None,
            version: None,
            headers: None,
            location_id: None,
            installed_app_id: None,
        }
    }

    /// Build a config from loaded settings. The URL provider is always set.
    pub fn from_settings(authenticator: Arc<dyn Authenticator>, settings: &ClientSettings) -> Self {
        Self {
            authenticator,
            url_provider: Some(settings.url_provider()),
            logging_id: settings.logging_id.clone(),
            version: settings.api_version.clone(),
            headers: None,
            location_id: settings.location_id.clone(),
            installed_app_id: settings.installed_app_id.clone(),
        }
    }

    pub fn with_url_provider(mut self, url_provider: UrlProvider) -> Self {
        self.url_provider = Some(url_provider);
        self
    }

    pub fn with_logging_id(mut self, logging_id: impl Into<String>) -> Self {
        self.logging_id = Some(logging_id.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_headers(mut self, headers: HttpHeaders) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_location_id(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    pub fn with_installed_app_id(mut self, installed_app_id: impl Into<String>) -> Self {
        self.installed_app_id = Some(installed_app_id.into());
        self
    }
}

impl fmt::Debug for EndpointClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointClientConfig")
            .field("url_provider", &self.url_provider)
            .field("logging_id", &self.logging_id)
            .field("version", &self.version)
            .field("headers", &self.headers.as_ref().map(|h| h.keys().collect::<Vec<_>>()))
            .field("location_id", &self.location_id)
            .field("installed_app_id", &self.installed_app_id)
            .finish_non_exhaustive()
    }
}
