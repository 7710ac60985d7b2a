//! Authenticators
//!
//! Three variants of the [`Authenticator`] port:
//! - [`NoOpAuthenticator`]: no credentials
//! - [`BearerTokenAuthenticator`]: a fixed bearer token
//! - [`RefreshTokenAuthenticator`]: a bearer token renewed through the OAuth
//!   refresh grant, with credentials kept in a [`RefreshTokenStore`]

pub mod bearer;
pub mod noop;
pub mod ports;
pub mod refresh_token;

pub use bearer::BearerTokenAuthenticator;
pub use noop::NoOpAuthenticator;
pub use ports::{Authenticator, RefreshGuard, RefreshTokenStore};
pub use refresh_token::RefreshTokenAuthenticator;

pub(crate) fn bearer_value(token: &str) -> String {
    format!("Bearer {token}")
}
