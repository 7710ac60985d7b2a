//! Port interfaces for HTTP operations

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use smartthings_domain::{EndpointError, HeadersExt, HttpHeaders, HttpMethod, Result};

/// Outgoing request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as `application/json`
    Json(Value),
    /// Serialized as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
}

/// A fully resolved request, ready to hand to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HttpHeaders,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Per-call deadline; `None` defers to the transport default
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HttpHeaders::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn with_headers(mut self, headers: HttpHeaders) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set_header(name, value);
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Option<RequestBody>) -> Self {
        self.body = body;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get_header(name)
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Convenience constructor serializing `body` as JSON.
    pub fn json(status: u16, body: &Value) -> Self {
        Self { status, body: body.to_string() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Parse the body as JSON. An empty body parses as `null`.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::Serialization` if the body is not valid JSON.
    pub fn json_body(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(|e| {
            EndpointError::Serialization(format!(
                "Failed to parse response body (status {}): {}",
                self.status, e
            ))
        })
    }

    /// Best-effort JSON view of the body for error reporting. Bodies that are
    /// not JSON are kept as a JSON string.
    pub fn body_value(&self) -> Value {
        self.json_body().unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

/// Trait for executing HTTP requests
///
/// Implementations must not interpret status codes: every completed exchange
/// is returned as `Ok`, only transport failures (connect, timeout, invalid
/// request) are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return its status and body
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
