//! Request executor
//!
//! Builds headers, authenticates, sends through the transport and performs
//! the single 401 refresh-and-retry.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use smartthings_domain::constants::{
    versioned_media_type, HEADER_ACCEPT, HEADER_CORRELATION, MEDIA_TYPE_JSON,
};
use smartthings_domain::{
    query_pairs, EndpointError, HeadersExt, HttpHeaders, HttpMethod, HttpParams, Result,
};
use tracing::{debug, info, instrument, warn};

use super::config::EndpointClientConfig;
use super::options::RequestOptions;
use crate::auth::Authenticator;
use crate::transport::{HttpRequest, HttpTransport, RequestBody};

/// Client for one family of REST endpoints, rooted at `base_path`.
///
/// Cloning is cheap; clones share the transport and the authenticator but own
/// their configuration.
#[derive(Clone)]
pub struct EndpointClient {
    base_path: String,
    config: EndpointClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl EndpointClient {
    pub fn new(
        base_path: impl Into<String>,
        config: EndpointClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self { base_path: base_path.into(), config, transport }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn config(&self) -> &EndpointClientConfig {
        &self.config
    }

    /// A client for a different base path sharing this client's config and
    /// transport.
    pub fn with_base_path(&self, base_path: impl Into<String>) -> Self {
        Self::new(base_path, self.config.clone(), Arc::clone(&self.transport))
    }

    /// Set a default header sent with every request.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.config.headers.get_or_insert_with(HttpHeaders::new).set_header(name, value);
        self
    }

    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        if let Some(headers) = self.config.headers.as_mut() {
            headers.remove_header(name);
        }
        self
    }

    pub fn set_authenticator(&mut self, authenticator: Arc<dyn Authenticator>) -> &mut Self {
        self.config.authenticator = authenticator;
        self
    }

    /// Resolve a request path against the URL provider and base path.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::Configuration` if no URL provider is set.
    pub fn url(&self, path: Option<&str>) -> Result<String> {
        let provider = self.config.url_provider.as_ref().ok_or_else(|| {
            EndpointError::Configuration("No URL provider specified".to_string())
        })?;

        let url = match path.filter(|p| !p.is_empty()) {
            Some(p) if p.starts_with("https://") => p.to_string(),
            Some(p) if p.starts_with('/') => format!("{}{}", provider.base_url, p),
            Some(p) => format!("{}/{}/{}", provider.base_url, self.base_path, p),
            None => format!("{}/{}", provider.base_url, self.base_path),
        };
        Ok(url)
    }

    /// Headers for one request, before authentication.
    ///
    /// Order: config defaults, correlation id, versioned `Accept`, then
    /// caller overrides.
    fn build_headers(&self, options: Option<&RequestOptions>) -> HttpHeaders {
        let mut headers = self.config.headers.clone().unwrap_or_default();

        if let Some(logging_id) = &self.config.logging_id {
            headers.set_header(HEADER_CORRELATION, logging_id.clone());
        }

        if let Some(version) = &self.config.version {
            let versioned = versioned_media_type(version);
            let accept = match headers.get_header(HEADER_ACCEPT) {
                None => versioned,
                Some(existing) if existing == MEDIA_TYPE_JSON => versioned,
                Some(existing) => format!("{versioned}, {existing}"),
            };
            headers.set_header(HEADER_ACCEPT, accept);
        }

        if let Some(overrides) = options.and_then(|o| o.header_overrides.as_ref()) {
            for (name, value) in overrides {
                headers.set_header(name.clone(), value.clone());
            }
        }

        headers
    }

    /// Execute a request and return the response body as JSON.
    ///
    /// A 401 triggers exactly one refresh through the authenticator followed
    /// by one retry. The retry's body is returned whatever its status.
    ///
    /// # Errors
    ///
    /// - `EndpointError::DryRun` for a dry run without a canned value
    /// - `EndpointError::Configuration` without a URL provider
    /// - `EndpointError::Api` for a non-2xx status (including a 401 the
    ///   authenticator cannot refresh)
    /// - the refresh error if refreshing fails
    /// - transport errors as returned by the transport
    #[instrument(skip(self, params, options, body), fields(base_path = %self.base_path))]
    pub async fn request(
        &self,
        method: HttpMethod,
        path: Option<&str>,
        params: Option<&HttpParams>,
        options: Option<&RequestOptions>,
        body: Option<Value>,
    ) -> Result<Value> {
        let headers = self.build_headers(options);
        let mut headers = self.config.authenticator.authenticate(headers).await?;

        if let Some(opts) = options.filter(|o| o.dry_run) {
            debug!("Dry run, request not sent");
            return opts.dry_run_return_value.clone().ok_or(EndpointError::DryRun);
        }

        let url = self.url(path)?;
        let request = HttpRequest::new(method, url)
            .with_query(params.map(query_pairs).unwrap_or_default())
            .with_body(body.map(RequestBody::Json))
            .with_timeout(options.and_then(|o| o.timeout));

        debug!(%method, url = %request.url, "Sending request");
        let response = self.transport.send(request.clone().with_headers(headers.clone())).await?;

        if response.is_success() {
            return response.json_body();
        }

        if response.is_unauthorized() {
            info!(url = %request.url, "Unauthorized, attempting token refresh");
            // Held through the retry.
            let _guard = self.config.authenticator.acquire_refresh_mutex().await;
            let refreshed = self.config.authenticator.refresh(&mut headers, &self.config).await;

            match refreshed {
                Ok(()) => {
                    let retry = self.transport.send(request.with_headers(headers)).await?;
                    if !retry.is_success() {
                        warn!(status = retry.status, "Retried request did not succeed");
                    }
                    return Ok(retry.body_value());
                }
                Err(err) if err.is_unsupported() => {
                    debug!("Authenticator cannot refresh");
                }
                Err(err) => {
                    warn!(error = %err, "Token refresh failed");
                    return Err(err);
                }
            }
        }

        warn!(status = response.status, url = %request.url, "Request failed");
        Err(EndpointError::Api { status: response.status, body: response.body_value() })
    }

    /// Execute a request and deserialize the JSON body into `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: Option<&str>,
        params: Option<&HttpParams>,
        options: Option<&RequestOptions>,
        body: Option<Value>,
    ) -> Result<T> {
        let value = self.request(method, path, params, options, body).await?;
        serde_json::from_value(value).map_err(|e| {
            EndpointError::Serialization(format!("Unexpected response shape: {e}"))
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: Option<&str>,
        params: Option<&HttpParams>,
        options: Option<&RequestOptions>,
    ) -> Result<T> {
        self.request_as(HttpMethod::Get, path, params, options, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: Option<&str>,
        body: Option<Value>,
        params: Option<&HttpParams>,
        options: Option<&RequestOptions>,
    ) -> Result<T> {
        self.request_as(HttpMethod::Post, path, params, options, body).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: Option<&str>,
        body: Option<Value>,
        params: Option<&HttpParams>,
        options: Option<&RequestOptions>,
    ) -> Result<T> {
        self.request_as(HttpMethod::Put, path, params, options, body).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: Option<&str>,
        body: Option<Value>,
        params: Option<&HttpParams>,
        options: Option<&RequestOptions>,
    ) -> Result<T> {
        self.request_as(HttpMethod::Patch, path, params, options, body).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: Option<&str>,
        body: Option<Value>,
        params: Option<&HttpParams>,
        options: Option<&RequestOptions>,
    ) -> Result<T> {
        self.request_as(HttpMethod::Delete, path, params, options, body).await
    }
}

impl std::fmt::Debug for EndpointClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointClient")
            .field("base_path", &self.base_path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
