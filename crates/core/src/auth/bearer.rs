use std::fmt;

use async_trait::async_trait;
use smartthings_domain::constants::HEADER_AUTHORIZATION;
use smartthings_domain::{HeadersExt, HttpHeaders, Result};

use super::bearer_value;
use super::ports::Authenticator;

/// Static bearer token authenticator.
///
/// Knows nothing about refreshing; an expired token simply stops working.
#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    token: String,
}

impl BearerTokenAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenAuthenticator").field("token", &"[REDACTED]").finish()
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    async fn authenticate(&self, mut headers: HttpHeaders) -> Result<HttpHeaders> {
        headers.set_header(HEADER_AUTHORIZATION, bearer_value(&self.token));
        Ok(headers)
    }

    async fn authenticate_generic(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
