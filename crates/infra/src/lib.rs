//! # SmartThings Infrastructure
//!
//! Implementations of the ports defined in `smartthings-core`.
//!
//! This crate contains:
//! - `ReqwestTransport`, the HTTP transport
//! - Refresh token stores (memory, JSON file, platform keychain)
//! - Settings loading from files and environment variables
//! - `EndpointClientBuilder`, which wires the pieces together
//!
//! ## Architecture
//! - Implements traits defined in `smartthings-core`
//! - Contains all "impure" code (network, filesystem, keychain)
//!
//! ## Features
//! - `keychain`: enables `KeychainTokenStore` through the `keyring` crate

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod token_store;

// Re-export commonly used items
pub use client::EndpointClientBuilder;
pub use errors::InfraError;
pub use http::{ReqwestTransport, ReqwestTransportBuilder};
#[cfg(feature = "keychain")]
pub use token_store::KeychainTokenStore;
pub use token_store::{FileTokenStore, InMemoryTokenStore, StoredCredentials};
