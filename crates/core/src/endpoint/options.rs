use std::time::Duration;

use serde_json::Value;
use smartthings_domain::{HeadersExt, HttpHeaders};

/// Per-call request options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Applied last, so they win over every computed header
    pub header_overrides: Option<HttpHeaders>,
    /// Build and authenticate the request but do not send it
    pub dry_run: bool,
    /// Returned in place of a response when `dry_run` is set
    pub dry_run_return_value: Option<Value>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_overrides.get_or_insert_with(HttpHeaders::new).set_header(name, value);
        self
    }

    pub fn with_header_overrides(mut self, headers: HttpHeaders) -> Self {
        self.header_overrides = Some(headers);
        self
    }

    /// Dry run that fails with `EndpointError::DryRun`.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Dry run that returns `value`.
    pub fn dry_run_returning(mut self, value: Value) -> Self {
        self.dry_run = true;
        self.dry_run_return_value = Some(value);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
