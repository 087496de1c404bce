//! Session identity lifecycle.
//!
//! Owns the active session identifier: adopt one supplied externally
//! (route or context), or mint one lazily on first interaction. Creation is
//! single-flight - concurrent callers racing on a missing identity
//! serialize behind an async lock, so the external service is asked for at
//! most one identity per miss.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use solace_core::error::Result;
use solace_core::service::SessionService;
use solace_core::session::SessionId;

/// Callback fired when a freshly minted identity is adopted, so the outer
/// layer can redirect to the session's canonical location.
pub type NavigationCallback = Arc<dyn Fn(&SessionId) + Send + Sync>;

/// Manages the active session identity for one client.
pub struct SessionIdentityManager {
    /// The adopted identity, if any.
    active: RwLock<Option<SessionId>>,
    /// External session-creation service.
    service: Arc<dyn SessionService>,
    /// Serializes creation so a miss never double-creates.
    creation_lock: Mutex<()>,
    /// Optional redirect hook fired on adoption of a minted identity.
    on_navigate: RwLock<Option<NavigationCallback>>,
}

impl SessionIdentityManager {
    /// Creates a manager with no active identity.
    pub fn new(service: Arc<dyn SessionService>) -> Self {
        Self {
            active: RwLock::new(None),
            service,
            creation_lock: Mutex::new(()),
            on_navigate: RwLock::new(None),
        }
    }

    /// Creates a manager that resumes an externally supplied identity.
    pub fn with_active(service: Arc<dyn SessionService>, session_id: SessionId) -> Self {
        Self {
            active: RwLock::new(Some(session_id)),
            service,
            creation_lock: Mutex::new(()),
            on_navigate: RwLock::new(None),
        }
    }

    /// Sets the navigation hook invoked when a minted identity is adopted.
    pub async fn set_navigation_callback(&self, callback: NavigationCallback) {
        *self.on_navigate.write().await = Some(callback);
    }

    /// Adopts an externally supplied identity (e.g. from the route).
    pub async fn adopt(&self, session_id: SessionId) {
        *self.active.write().await = Some(session_id);
    }

    /// Returns the active identity, if any.
    pub async fn active(&self) -> Option<SessionId> {
        self.active.read().await.clone()
    }

    /// Returns the active identity, creating one if none exists.
    ///
    /// Idempotent: an existing identity is returned unchanged. On a miss,
    /// exactly one creation call is made even under concurrent callers;
    /// once minted, the identity is adopted immediately and the navigation
    /// hook fires so the caller can redirect.
    ///
    /// # Errors
    ///
    /// Returns [`solace_core::SolaceError::SessionCreation`] if the service
    /// is unreachable or mints an invalid identity. The identity stays
    /// absent, so a later call may retry.
    pub async fn ensure_session(&self) -> Result<SessionId> {
        if let Some(existing) = self.active.read().await.clone() {
            return Ok(existing);
        }

        let _guard = self.creation_lock.lock().await;

        // A racing caller may have won the lock first and adopted.
        if let Some(existing) = self.active.read().await.clone() {
            return Ok(existing);
        }

        let minted = self.service.create_session().await?;
        *self.active.write().await = Some(minted.clone());

        tracing::info!(session_id = %minted, "adopted newly created session");

        if let Some(navigate) = self.on_navigate.read().await.as_ref() {
            navigate(&minted);
        }

        Ok(minted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use solace_core::SolaceError;

    /// Mock session service that counts creations and can fail or stall.
    struct MockSessionService {
        calls: AtomicUsize,
        fail: bool,
        delay: Option<Duration>,
    }

    impl MockSessionService {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                delay: None,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionService for MockSessionService {
        async fn create_session(&self) -> Result<SessionId> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(SolaceError::session_creation("service unreachable"));
            }
            SessionId::new(format!("minted-{}", uuid::Uuid::new_v4()))
        }
    }

    #[tokio::test]
    async fn test_existing_identity_is_returned_unchanged() {
        let service = Arc::new(MockSessionService::new());
        let manager = SessionIdentityManager::new(service.clone());
        let supplied = SessionId::new("route-7").unwrap();
        manager.adopt(supplied.clone()).await;

        let resolved = manager.ensure_session().await.unwrap();
        assert_eq!(resolved, supplied);
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_creates_exactly_once() {
        let service = Arc::new(MockSessionService::new());
        let manager = SessionIdentityManager::new(service.clone());

        let first = manager.ensure_session().await.unwrap();
        let second = manager.ensure_session().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_do_not_double_create() {
        let service = Arc::new(MockSessionService::slow(Duration::from_millis(50)));
        let manager = Arc::new(SessionIdentityManager::new(service.clone()));

        let a = tokio::spawn({
            let manager = manager.clone();
            async move { manager.ensure_session().await.unwrap() }
        });
        let b = tokio::spawn({
            let manager = manager.clone();
            async move { manager.ensure_session().await.unwrap() }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(a, b);
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_creation_failure_leaves_identity_absent() {
        let service = Arc::new(MockSessionService::failing());
        let manager = SessionIdentityManager::new(service.clone());

        let err = manager.ensure_session().await.unwrap_err();
        assert!(err.is_session_creation());
        assert!(manager.active().await.is_none());

        // A later call retries the creation.
        let _ = manager.ensure_session().await;
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn test_navigation_fires_once_on_mint() {
        let service = Arc::new(MockSessionService::new());
        let manager = SessionIdentityManager::new(service);

        let navigations = Arc::new(AtomicUsize::new(0));
        let seen = navigations.clone();
        manager
            .set_navigation_callback(Arc::new(move |_id| {
                seen.fetch_add(1, Ordering::SeqCst);
            }))
            .await;

        manager.ensure_session().await.unwrap();
        manager.ensure_session().await.unwrap();

        assert_eq!(navigations.load(Ordering::SeqCst), 1);
    }
}
