//! # SmartThings Domain
//!
//! Data types shared by every layer of the SmartThings REST client.
//!
//! This crate contains:
//! - Credential values exchanged with the token store (`AuthData`,
//!   `RefreshData`)
//! - HTTP vocabulary used by the request pipeline (methods, headers, params)
//! - Paged list wire types (`PagedResult`, `Links`)
//! - Client settings and URL providers
//! - The `EndpointError` type and `Result` alias
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Only serde, serde_json and thiserror
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
