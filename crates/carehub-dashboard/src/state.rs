//! Dashboard application state.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};

use carehub_core::{CarehubConfig, DashboardConfig, SessionStoreConfig, StoreBackend};
use carehub_session::{
    AuthController, HttpIpLookup, InMemoryBackend, IpLookup, SessionStore, StaticIp, StoreError,
    SupabaseSessionStore,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DashboardError;

/// Creates one session store client per browser session.
pub enum StoreFactory {
    /// Clients share one in-process backend.
    Memory(Arc<InMemoryBackend>),
    /// Clients talk to the hosted service.
    Supabase(SessionStoreConfig),
}

impl StoreFactory {
    pub fn from_config(config: &SessionStoreConfig) -> Self {
        match config.backend {
            StoreBackend::Memory => Self::Memory(InMemoryBackend::from_seed(&config.seed_users)),
            StoreBackend::Supabase => Self::Supabase(config.clone()),
        }
    }

    fn connect(&self) -> Result<Arc<dyn SessionStore>, StoreError> {
        Ok(match self {
            Self::Memory(backend) => Arc::new(backend.connect()),
            Self::Supabase(config) => Arc::new(SupabaseSessionStore::from_config(config)?),
        })
    }
}

/// Shared application state for the dashboard.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    stores: StoreFactory,
    ip_lookup: Arc<dyn IpLookup>,
    client_descriptor: String,
    idle_timeout: Duration,
    /// Browser session id (cookie value) to its auth controller.
    sessions: RwLock<HashMap<String, TrackedSession>>,
}

struct TrackedSession {
    controller: AuthController,
    last_seen: Instant,
}

impl TrackedSession {
    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= timeout
    }
}

impl AppState {
    pub fn new(
        config: DashboardConfig,
        stores: StoreFactory,
        ip_lookup: Arc<dyn IpLookup>,
        client_descriptor: impl Into<String>,
    ) -> Self {
        let idle_timeout = config.session_idle_timeout();
        Self::with_idle_timeout(config, stores, ip_lookup, client_descriptor, idle_timeout)
    }

    fn with_idle_timeout(
        config: DashboardConfig,
        stores: StoreFactory,
        ip_lookup: Arc<dyn IpLookup>,
        client_descriptor: impl Into<String>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                ip_lookup,
                client_descriptor: client_descriptor.into(),
                idle_timeout,
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Build the state described by a full configuration.
    pub fn from_config(config: &CarehubConfig) -> Self {
        let ip_lookup: Arc<dyn IpLookup> = if config.ip_lookup.enabled {
            Arc::new(HttpIpLookup::new(config.ip_lookup.url.clone()))
        } else {
            Arc::new(StaticIp::unknown())
        };
        Self::new(
            config.dashboard.clone(),
            StoreFactory::from_config(&config.session_store),
            ip_lookup,
            config.session_store.client_descriptor.clone(),
        )
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    fn sessions(&self) -> RwLockWriteGuard<'_, HashMap<String, TrackedSession>> {
        self.inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Controller of a live browser session. Each lookup counts as use; a
    /// session idle past the timeout is dropped instead.
    pub fn session(&self, id: &str) -> Option<AuthController> {
        let now = Instant::now();
        let mut sessions = self.sessions();
        let entry = sessions.get_mut(id)?;
        if entry.is_idle(now, self.inner.idle_timeout) {
            sessions.remove(id);
            debug!(session = %id, "Browser session expired");
            return None;
        }
        entry.last_seen = now;
        Some(entry.controller.clone())
    }

    /// Controller for a sign-in attempt: the live session named by `id`, or
    /// a fresh initialized controller that is not tracked until
    /// [`AppState::track`] is called.
    pub async fn session_or_new(
        &self,
        id: Option<&str>,
    ) -> Result<(Option<String>, AuthController), DashboardError> {
        if let Some(id) = id
            && let Some(controller) = self.session(id)
        {
            return Ok((Some(id.to_string()), controller));
        }

        let store = self.inner.stores.connect()?;
        let controller = AuthController::with_client_descriptor(
            store,
            self.inner.ip_lookup.clone(),
            self.inner.client_descriptor.clone(),
        );
        controller.initialize().await;
        Ok((None, controller))
    }

    /// Start tracking a signed-in controller under a new browser session id.
    /// Idle sessions are swept on the way.
    pub fn track(&self, controller: AuthController) -> String {
        let now = Instant::now();
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(now, self.inner.idle_timeout));
        if sessions.len() < before {
            debug!(expired = before - sessions.len(), "Dropped idle browser sessions");
        }
        sessions.insert(
            id.clone(),
            TrackedSession {
                controller,
                last_seen: now,
            },
        );
        debug!(session = %id, "Opened browser session");
        id
    }

    /// Forget a browser session. Dropping the last controller handle
    /// unregisters its store listener.
    pub fn close_session(&self, id: &str) -> Option<AuthController> {
        let removed = self.sessions().remove(id).map(|entry| entry.controller);
        if removed.is_some() {
            info!(session = %id, "Closed browser session");
        }
        removed
    }

    /// Number of tracked browser sessions that have not gone idle.
    pub fn session_count(&self) -> usize {
        let now = Instant::now();
        self.inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|entry| !entry.is_idle(now, self.inner.idle_timeout))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_core::{LoginCredentials, Role};
    use carehub_session::AuthPhase;

    fn state() -> AppState {
        AppState::new(
            DashboardConfig::default(),
            StoreFactory::Memory(InMemoryBackend::new()),
            Arc::new(StaticIp::unknown()),
            "tests",
        )
    }

    #[tokio::test]
    async fn only_tracked_sessions_are_kept() {
        let state = state();
        let (id, controller) = state.session_or_new(None).await.unwrap();
        assert_eq!(id, None);
        assert_eq!(controller.phase(), AuthPhase::Unauthenticated);
        assert_eq!(state.session_count(), 0);

        let id = state.track(controller);
        assert_eq!(state.session_count(), 1);
        assert!(state.session(&id).is_some());

        let (same, _) = state.session_or_new(Some(&id)).await.unwrap();
        assert_eq!(same.as_deref(), Some(id.as_str()));
        let (other, _) = state.session_or_new(Some("stale-cookie")).await.unwrap();
        assert_eq!(other, None);
        assert_eq!(state.session_count(), 1);

        assert!(state.close_session(&id).is_some());
        assert!(state.session(&id).is_none());
        assert!(state.close_session(&id).is_none());
    }

    #[tokio::test]
    async fn failed_logins_leave_no_sessions() {
        let backend = InMemoryBackend::new();
        let state = AppState::new(
            DashboardConfig::default(),
            StoreFactory::Memory(backend),
            Arc::new(StaticIp::unknown()),
            "tests",
        );
        let credentials = LoginCredentials {
            email: "nobody@h.com".to_string(),
            password: "nope".to_string(),
            role: Role::Patient,
        };
        for _ in 0..5 {
            let (id, controller) = state.session_or_new(None).await.unwrap();
            assert!(id.is_none());
            assert!(!controller.login(&credentials).await.success);
        }
        assert_eq!(state.session_count(), 0);
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let state = AppState::with_idle_timeout(
            DashboardConfig::default(),
            StoreFactory::Memory(InMemoryBackend::new()),
            Arc::new(StaticIp::unknown()),
            "tests",
            Duration::from_millis(200),
        );
        let (_, controller) = state.session_or_new(None).await.unwrap();
        let stale = state.track(controller.clone());
        let busy = state.track(controller);

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(80)).await;
            assert!(state.session(&busy).is_some());
        }
        assert_eq!(state.session_count(), 1);
        assert!(state.session(&stale).is_none());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(state.session_count(), 0);
        let (_, controller) = state.session_or_new(None).await.unwrap();
        state.track(controller);
        assert_eq!(state.sessions().len(), 1);
    }

    #[test]
    fn supabase_factory_without_url_fails_to_connect() {
        let config = SessionStoreConfig {
            backend: StoreBackend::Supabase,
            ..Default::default()
        };
        let factory = StoreFactory::from_config(&config);
        assert!(factory.connect().is_err());
    }
}
