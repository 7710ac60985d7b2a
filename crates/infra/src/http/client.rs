use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Method};
use smartthings_core::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
use smartthings_domain::{EndpointError, HttpHeaders, HttpMethod, Result};
use tracing::debug;

use crate::errors::InfraError;

/// [`HttpTransport`] backed by reqwest.
///
/// Every completed exchange is returned as a response; status codes are left
/// to the caller. No retries are performed and no timeout applies unless one
/// is configured here or passed per request.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: ReqwestClient,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest { method, url, headers, query, body, timeout } = request;
        let timeout = timeout.or(self.timeout);

        let mut builder = self.client.request(to_method(method), &url).headers(header_map(&headers)?);

        if !query.is_empty() {
            builder = builder.query(&query);
        }

        builder = match body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(pairs)) => builder.form(&pairs),
            None => builder,
        };

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        debug!(%method, %url, "sending HTTP request");
        let response = builder.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            send_error(err, timeout)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| send_error(err, timeout))?;
        debug!(%method, %url, status, "received HTTP response");

        Ok(HttpResponse::new(status, body))
    }
}

fn send_error(err: reqwest::Error, timeout: Option<Duration>) -> EndpointError {
    match timeout {
        Some(limit) if err.is_timeout() => EndpointError::Timeout(limit),
        _ => InfraError::from(err).into(),
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn header_map(headers: &HttpHeaders) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| EndpointError::InvalidInput(format!("invalid header name '{name}': {e}")))?;
        let mut header_value = HeaderValue::from_str(value)
            .map_err(|e| EndpointError::InvalidInput(format!("invalid value for header '{name}': {e}")))?;
        if header_name == AUTHORIZATION {
            header_value.set_sensitive(true);
        }
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug, Default)]
pub struct ReqwestTransportBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl ReqwestTransportBuilder {
    /// Client-wide timeout, used when a request carries none.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<ReqwestTransport> {
        let mut builder = ReqwestClient::builder();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(InfraError::from)?;

        Ok(ReqwestTransport { client, timeout: self.timeout })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::builder().user_agent("smartthings-test").build().unwrap()
    }

    #[tokio::test]
    async fn returns_success_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices"))
            .and(query_param("max", "10"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let request = HttpRequest::new(HttpMethod::Get, format!("{}/devices", server.uri()))
            .with_header("Accept", "application/json")
            .with_query(vec![("max".to_string(), "10".to_string())]);

        let response = transport().send(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.json_body().unwrap(), json!({"items": []}));
    }

    #[tokio::test]
    async fn header_names_differing_by_case_are_all_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(1).mount(&server).await;

        let mut request = HttpRequest::new(HttpMethod::Get, server.uri());
        request.headers.insert("X-Tag".to_string(), "upper".to_string());
        request.headers.insert("x-tag".to_string(), "lower".to_string());
        transport().send(request).await.unwrap();

        let received = server.received_requests().await.unwrap();
        let mut tags: Vec<&str> =
            received[0].headers.get_all("x-tag").iter().filter_map(|v| v.to_str().ok()).collect();
        tags.sort_unstable();
        assert_eq!(tags, vec!["lower", "upper"]);
    }

    #[tokio::test]
    async fn error_statuses_are_responses_not_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .expect(1)
            .mount(&server)
            .await;

        let response =
            transport().send(HttpRequest::new(HttpMethod::Get, server.uri())).await.unwrap();
        assert_eq!(response, HttpResponse::new(401, "expired"));
    }

    #[tokio::test]
    async fn sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"commands": [{"command": "on"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;

        let request = HttpRequest::new(HttpMethod::Post, server.uri())
            .with_body(Some(RequestBody::Json(json!({"commands": [{"command": "on"}]}))));

        let response = transport().send(request).await.unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn sends_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string("grant_type=refresh_token&client_id=abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let request = HttpRequest::new(HttpMethod::Post, server.uri())
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(Some(RequestBody::Form(vec![
                ("grant_type".to_string(), "refresh_token".to_string()),
                ("client_id".to_string(), "abc".to_string()),
            ])));

        let response = transport().send(request).await.unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn per_request_timeout_maps_to_timeout_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let request = HttpRequest::new(HttpMethod::Get, server.uri())
            .with_timeout(Some(Duration::from_millis(50)));

        let err = transport().send(request).await.unwrap_err();
        assert_eq!(err, EndpointError::Timeout(Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn client_wide_timeout_applies_when_request_has_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let transport =
            ReqwestTransport::builder().timeout(Duration::from_millis(50)).build().unwrap();

        let err = transport.send(HttpRequest::new(HttpMethod::Get, server.uri())).await.unwrap_err();
        assert_eq!(err, EndpointError::Timeout(Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn invalid_header_name_is_rejected() {
        let request = HttpRequest::new(HttpMethod::Get, "http://127.0.0.1:9")
            .with_header("bad header", "value");

        let err = transport().send(request).await.unwrap_err();
        assert!(matches!(err, EndpointError::InvalidInput(_)));
    }
}
