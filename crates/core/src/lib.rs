//! # SmartThings Core
//!
//! The authenticated request pipeline, free of any concrete HTTP or storage
//! code.
//!
//! This crate contains:
//! - Port interfaces (traits) for the HTTP transport and the token store
//! - The `Authenticator` capability and its three variants
//! - `EndpointClient`, the request executor with single 401 refresh-and-retry
//! - The pagination walker (lazy iterator and eager aggregation)
//!
//! ## Architecture Principles
//! - Only depends on `smartthings-domain`
//! - All I/O goes through `HttpTransport` and `RefreshTokenStore`
//! - Adapters live in `smartthings-infra`
//!
//! ```text
//! caller ─► EndpointClient::request
//!              ├─► Authenticator::authenticate
//!              ├─► HttpTransport::send
//!              └─► on 401: acquire_refresh_mutex ─► refresh ─► send (once)
//! ```

pub mod auth;
pub mod endpoint;
pub mod pagination;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export specific items to avoid ambiguity
pub use auth::{
    Authenticator, BearerTokenAuthenticator, NoOpAuthenticator, RefreshGuard,
    RefreshTokenAuthenticator, RefreshTokenStore,
};
pub use endpoint::{Endpoint, EndpointClient, EndpointClientConfig, RequestOptions};
pub use pagination::PaginatedListIterator;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
