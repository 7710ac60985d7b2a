//! Request executor and client configuration

pub mod client;
pub mod config;
pub mod options;
pub mod scoped;

pub use client::EndpointClient;
pub use config::EndpointClientConfig;
pub use options::RequestOptions;
pub use scoped::Endpoint;
