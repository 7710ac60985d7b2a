//! Client configuration structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUTH_URL, DEFAULT_BASE_URL, DEFAULT_KEY_API_URL};

/// The set of service URLs a client talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlProvider {
    /// Root of the REST API, without a trailing slash
    pub base_url: String,
    /// OAuth token endpoint used for refresh grants
    pub auth_url: String,
    /// Key service root
    pub key_api_url: String,
}

impl UrlProvider {
    pub fn new(
        base_url: impl Into<String>,
        auth_url: impl Into<String>,
        key_api_url: impl Into<String>,
    ) -> Self {
        Self { base_url: base_url.into(), auth_url: auth_url.into(), key_api_url: key_api_url.into() }
    }
}

impl Default for UrlProvider {
    /// Production SmartThings endpoints.
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_AUTH_URL, DEFAULT_KEY_API_URL)
    }
}

/// Settings loaded from files or the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub auth_url: String,
    pub key_api_url: String,
    /// Rendered into the `Accept` header as a vendor media type
    pub api_version: Option<String>,
    /// Sent as the correlation header on every request
    pub logging_id: Option<String>,
    pub location_id: Option<String>,
    pub installed_app_id: Option<String>,
    /// Client-wide request timeout; `None` leaves requests unbounded
    pub timeout_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            key_api_url: DEFAULT_KEY_API_URL.to_string(),
            api_version: None,
            logging_id: None,
            location_id: None,
            installed_app_id: None,
            timeout_secs: None,
        }
    }
}

impl ClientSettings {
    pub fn url_provider(&self) -> UrlProvider {
        UrlProvider::new(
            self.base_url.trim_end_matches('/'),
            self.auth_url.clone(),
            self.key_api_url.trim_end_matches('/'),
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_production() {
        let settings = ClientSettings::default();
        assert_eq!(settings.base_url, "https://api.smartthings.com");
        assert_eq!(settings.auth_url, "https://auth-global.api.smartthings.com/oauth/token");
        assert_eq!(settings.key_api_url, "https://key.smartthings.com");
        assert_eq!(settings.timeout(), None);
        assert_eq!(settings.url_provider(), UrlProvider::default());
    }

    #[test]
    fn test_url_provider_trims_trailing_slashes() {
        let settings = ClientSettings {
            base_url: "https://api.example.com/".to_string(),
            key_api_url: "https://key.example.com//".to_string(),
            ..Default::default()
        };

        let provider = settings.url_provider();
        assert_eq!(provider.base_url, "https://api.example.com");
        assert_eq!(provider.key_api_url, "https://key.example.com");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: ClientSettings = toml::from_str(
            r#"
            api_version = "20170916"
            timeout_secs = 15
            "#,
        )
        .unwrap();

        assert_eq!(settings.api_version.as_deref(), Some("20170916"));
        assert_eq!(settings.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(settings.base_url, "https://api.smartthings.com");
    }
}
