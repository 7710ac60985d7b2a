//! In-process doubles for the transport and token store ports
//!
//! Enabled for this crate's tests and for downstream crates through the
//! `test-utils` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use smartthings_domain::{AuthData, EndpointError, RefreshData, Result};
use tokio::sync::Mutex;

use crate::auth::RefreshTokenStore;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync>;

enum Script {
    Responder(Responder),
    Queue(Mutex<VecDeque<HttpResponse>>),
}

/// Transport that answers from a script and records every request.
///
/// Each `send` yields to the scheduler once before answering, so concurrent
/// requests interleave the way real network calls do.
pub struct ScriptedTransport {
    script: Script,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Answer every request with `responder`.
    pub fn new(
        responder: impl Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
    ) -> Self {
        Self { script: Script::Responder(Box::new(responder)), requests: Mutex::new(Vec::new()) }
    }

    /// Answer requests in order from `responses`. Running out is a network
    /// error.
    pub fn from_responses(responses: Vec<HttpResponse>) -> Self {
        Self { script: Script::Queue(Mutex::new(responses.into())), requests: Mutex::new(Vec::new()) }
    }

    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Requests whose URL starts with `prefix`.
    pub async fn requests_to(&self, prefix: &str) -> Vec<HttpRequest> {
        self.requests.lock().await.iter().filter(|r| r.url.starts_with(prefix)).cloned().collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        tokio::task::yield_now().await;
        self.requests.lock().await.push(request.clone());

        match &self.script {
            Script::Responder(responder) => responder(&request),
            Script::Queue(queue) => queue.lock().await.pop_front().ok_or_else(|| {
                EndpointError::Network(format!("no scripted response left for {}", request.url))
            }),
        }
    }
}

/// Token store holding refresh data in memory and recording every write.
pub struct MemoryTokenStore {
    refresh_data: Mutex<RefreshData>,
    saved: Mutex<Vec<AuthData>>,
    loads: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn new(refresh_data: RefreshData) -> Self {
        Self { refresh_data: Mutex::new(refresh_data), saved: Mutex::new(Vec::new()), loads: AtomicUsize::new(0) }
    }

    /// Every `AuthData` written so far, oldest first.
    pub async fn saved(&self) -> Vec<AuthData> {
        self.saved.lock().await.clone()
    }

    /// Number of `get_refresh_data` calls.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryTokenStore {
    async fn get_refresh_data(&self) -> Result<RefreshData> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.refresh_data.lock().await.clone())
    }

    async fn put_auth_data(&self, data: &AuthData) -> Result<()> {
        self.refresh_data.lock().await.refresh_token.clone_from(&data.refresh_token);
        self.saved.lock().await.push(data.clone());
        Ok(())
    }
}
