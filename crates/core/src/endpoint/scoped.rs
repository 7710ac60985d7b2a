use smartthings_domain::{EndpointError, Result};

use super::client::EndpointClient;

/// Base for resource endpoints that resolve location and installed-app
/// scoping ids.
#[derive(Debug, Clone)]
pub struct Endpoint {
    client: EndpointClient,
}

impl Endpoint {
    pub fn new(client: EndpointClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &EndpointClient {
        &self.client
    }

    /// The explicit id, else the configured one. Empty ids count as absent.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::InvalidInput` if neither is set.
    pub fn location_id(&self, id: Option<&str>) -> Result<String> {
        resolve(id, self.client.config().location_id.as_deref())
            .ok_or_else(|| EndpointError::InvalidInput("Location ID not defined".to_string()))
    }

    pub fn installed_app_id(&self, id: Option<&str>) -> Result<String> {
        resolve(id, self.client.config().installed_app_id.as_deref())
            .ok_or_else(|| EndpointError::InvalidInput("Installed App ID not defined".to_string()))
    }
}

fn resolve(explicit: Option<&str>, configured: Option<&str>) -> Option<String> {
    explicit.filter(|id| !id.is_empty()).or(configured.filter(|id| !id.is_empty())).map(String::from)
}
