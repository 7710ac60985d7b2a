//! Port interfaces for authentication

use std::fmt;

use async_trait::async_trait;
use smartthings_domain::{AuthData, EndpointError, HttpHeaders, RefreshData, Result};
use tokio::sync::OwnedMutexGuard;

use crate::endpoint::EndpointClientConfig;

/// Trait for adding credentials to outgoing requests
///
/// Implementations are stateful (a refreshing authenticator owns the current
/// access token) and are shared across concurrent requests behind an `Arc`.
/// Capabilities a variant does not have report
/// [`EndpointError::UnsupportedOperation`], which callers treat as "not
/// available" rather than as a failed attempt.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Return `headers` with credentials added.
    async fn authenticate(&self, headers: HttpHeaders) -> Result<HttpHeaders>;

    /// Return the current credential as a bare string.
    async fn authenticate_generic(&self) -> Result<String>;

    /// Obtain a new credential and patch `headers` in place.
    async fn refresh(
        &self,
        _headers: &mut HttpHeaders,
        _config: &EndpointClientConfig,
    ) -> Result<()> {
        Err(EndpointError::unsupported("refresh"))
    }

    /// Serialize refreshes across concurrent requests.
    ///
    /// `None` means the variant offers no mutual exclusion and concurrent
    /// refreshes run unguarded.
    async fn acquire_refresh_mutex(&self) -> Option<RefreshGuard> {
        None
    }

    async fn login(&self) -> Result<()> {
        Err(EndpointError::unsupported("login"))
    }

    async fn logout(&self) -> Result<()> {
        Err(EndpointError::unsupported("logout"))
    }
}

/// Trait for persisting refresh credentials
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Load the refresh token and client credentials.
    async fn get_refresh_data(&self) -> Result<RefreshData>;

    /// Persist the tokens returned by a successful refresh.
    async fn put_auth_data(&self, data: &AuthData) -> Result<()>;
}

type ReleaseFn = Box<dyn FnOnce() + Send>;

/// Scoped holder of the refresh mutex
///
/// The release action runs exactly once, either through [`release`] or when
/// the guard is dropped.
///
/// [`release`]: RefreshGuard::release
pub struct RefreshGuard {
    release: Option<ReleaseFn>,
}

impl RefreshGuard {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// Wrap an owned tokio mutex guard; releasing drops the guard.
    pub fn from_mutex_guard(guard: OwnedMutexGuard<()>) -> Self {
        Self::new(move || drop(guard))
    }

    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for RefreshGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshGuard").field("held", &self.release.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use super::*;

    #[test]
    fn test_guard_releases_once_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let guard = RefreshGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_release_does_not_run_twice() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let guard = RefreshGuard::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        guard.release();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mutex_guard_unlocks_on_release() {
        let lock = Arc::new(Mutex::new(()));

        let guard = RefreshGuard::from_mutex_guard(Arc::clone(&lock).lock_owned().await);
        assert!(lock.try_lock().is_err());

        guard.release();
        assert!(lock.try_lock().is_ok());
    }
}
