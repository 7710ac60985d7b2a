use async_trait::async_trait;
use smartthings_domain::{HttpHeaders, Result};

use super::ports::Authenticator;

/// Authenticator that adds nothing.
///
/// For tests and for endpoints that need no credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAuthenticator;

#[async_trait]
impl Authenticator for NoOpAuthenticator {
    async fn authenticate(&self, headers: HttpHeaders) -> Result<HttpHeaders> {
        Ok(headers)
    }

    async fn authenticate_generic(&self) -> Result<String> {
        Ok(String::new())
    }
}
