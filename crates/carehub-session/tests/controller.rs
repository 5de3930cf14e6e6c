//! Behavior of the auth state controller against the in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use carehub_core::{
    AuthenticatedUser, LoginCredentials, LoginSession, NewLoginSession, ProfilePatch,
    RegisterData, Role, SeedUser,
};
use carehub_session::{
    AuthController, AuthPhase, AuthSession, InMemoryBackend, InMemorySessionStore,
    LOGIN_HISTORY_LIMIT, SessionListener, SessionQuery, SessionStore, SignUp, StaticIp,
    StoreError, Subscription,
};
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, Notify};

/// Delegates to an in-memory client, with switchable failures, call counts
/// and a gate that can hold profile fetches.
struct FlakyStore {
    inner: InMemorySessionStore,
    fail_close_sessions: AtomicBool,
    fail_sign_out: AtomicBool,
    fail_history: AtomicBool,
    fail_profile_fetch: AtomicBool,
    profile_writes: AtomicUsize,
    sign_out_calls: AtomicUsize,
    gate_profile_fetch: AtomicBool,
    profile_gate: Mutex<()>,
    profile_fetch_waiting: Notify,
}

impl FlakyStore {
    fn new(inner: InMemorySessionStore) -> Self {
        Self {
            inner,
            fail_close_sessions: AtomicBool::new(false),
            fail_sign_out: AtomicBool::new(false),
            fail_history: AtomicBool::new(false),
            fail_profile_fetch: AtomicBool::new(false),
            profile_writes: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            gate_profile_fetch: AtomicBool::new(false),
            profile_gate: Mutex::new(()),
            profile_fetch_waiting: Notify::new(),
        }
    }

    fn outage() -> StoreError {
        StoreError::Rejected {
            status: 503,
            message: "service unavailable".to_string(),
        }
    }
}

#[async_trait]
impl SessionStore for FlakyStore {
    async fn current_session(&self) -> Result<Option<AuthSession>, StoreError> {
        self.inner.current_session().await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        self.inner.sign_in(email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, StoreError> {
        self.inner.sign_up(email, password).await
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.sign_out().await
    }

    fn subscribe(&self, listener: SessionListener) -> Subscription {
        self.inner.subscribe(listener)
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<AuthenticatedUser, StoreError> {
        if self.fail_profile_fetch.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        if self.gate_profile_fetch.load(Ordering::SeqCst) {
            self.profile_fetch_waiting.notify_one();
            let _open = self.profile_gate.lock().await;
        }
        self.inner.fetch_profile(user_id).await
    }

    async fn insert_profile(&self, profile: &AuthenticatedUser) -> Result<(), StoreError> {
        self.inner.insert_profile(profile).await
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.profile_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_profile(user_id, patch, updated_at).await
    }

    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.inner.touch_last_login(user_id, at).await
    }

    async fn insert_login_session(&self, session: NewLoginSession) -> Result<LoginSession, StoreError> {
        self.inner.insert_login_session(session).await
    }

    async fn close_active_sessions(&self, user_id: &str, at: DateTime<Utc>) -> Result<usize, StoreError> {
        if self.fail_close_sessions.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.close_active_sessions(user_id, at).await
    }

    async fn list_login_sessions(&self, query: &SessionQuery) -> Result<Vec<LoginSession>, StoreError> {
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.list_login_sessions(query).await
    }
}

fn patient_seed() -> SeedUser {
    SeedUser {
        email: "a@h.com".to_string(),
        password: "secret".to_string(),
        role: Role::Patient,
        first_name: "Ada".to_string(),
        last_name: "Patient".to_string(),
        phone: None,
        department: None,
        specialization: None,
    }
}

fn staff_seed() -> SeedUser {
    SeedUser {
        email: "sarah@h.com".to_string(),
        password: "staffpass".to_string(),
        role: Role::HospitalStaff,
        first_name: "Sarah".to_string(),
        last_name: "Wilson".to_string(),
        phone: None,
        department: Some("Cardiology".to_string()),
        specialization: None,
    }
}

fn credentials(email: &str, password: &str, role: Role) -> LoginCredentials {
    LoginCredentials {
        email: email.to_string(),
        password: password.to_string(),
        role,
    }
}

struct Harness {
    backend: Arc<InMemoryBackend>,
    store: Arc<FlakyStore>,
    controller: AuthController,
}

async fn harness() -> Harness {
    let backend = InMemoryBackend::from_seed(&[patient_seed(), staff_seed()]);
    let store = Arc::new(FlakyStore::new(backend.connect()));
    let controller = AuthController::with_client_descriptor(
        store.clone(),
        Arc::new(StaticIp::new("203.0.113.7")),
        "carehub-tests",
    );
    controller.initialize().await;
    Harness {
        backend,
        store,
        controller,
    }
}

/// Wait until the controller reaches `phase`, failing after a second.
async fn wait_for_phase(controller: &AuthController, phase: AuthPhase) {
    let mut rx = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| s.phase == phase))
        .await
        .expect("timed out waiting for phase")
        .expect("controller dropped");
}

#[tokio::test]
async fn starts_initializing_and_leaves_once() {
    let backend = InMemoryBackend::from_seed(&[patient_seed()]);
    let controller = AuthController::new(Arc::new(backend.connect()), Arc::new(StaticIp::unknown()));
    assert_eq!(controller.phase(), AuthPhase::Initializing);
    assert!(controller.is_loading());

    controller.initialize().await;
    assert_eq!(controller.phase(), AuthPhase::Unauthenticated);
    assert!(!controller.is_loading());
    assert!(controller.user().is_none());

    controller.initialize().await;
    assert_eq!(controller.phase(), AuthPhase::Unauthenticated);
}

#[tokio::test]
async fn restores_existing_session() {
    let backend = InMemoryBackend::from_seed(&[patient_seed()]);
    let store = Arc::new(backend.connect());
    store.sign_in("a@h.com", "secret").await.unwrap();

    let controller = AuthController::new(store, Arc::new(StaticIp::unknown()));
    controller.initialize().await;

    assert_eq!(controller.phase(), AuthPhase::Authenticated);
    assert_eq!(controller.user().unwrap().email, "a@h.com");
}

#[tokio::test]
async fn login_accepted_by_store() {
    let h = harness().await;
    h.backend.set_accept_any_password(true);

    let outcome = h
        .controller
        .login(&credentials("a@h.com", "x", Role::Patient))
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.error, None);
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.phase, AuthPhase::Authenticated);
    assert!(!snapshot.loading);
    let user = snapshot.user.unwrap();
    assert_eq!(user.role, Role::Patient);
    assert!(user.last_login.is_some());
}

#[tokio::test]
async fn login_records_one_active_session() {
    let h = harness().await;
    h.controller
        .login(&credentials("sarah@h.com", "staffpass", Role::HospitalStaff))
        .await;
    let user = h.controller.user().unwrap();

    let sessions = h.backend.login_sessions_for(&user.id);
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].is_active);
    assert!(sessions[0].logout_time.is_none());
    assert_eq!(sessions[0].ip_address.as_deref(), Some("203.0.113.7"));
    assert_eq!(sessions[0].user_agent.as_deref(), Some("carehub-tests"));
    assert!(h.backend.profile(&user.id).unwrap().last_login.is_some());
}

#[tokio::test]
async fn login_rejected_leaves_state_unchanged() {
    let h = harness().await;

    let outcome = h
        .controller
        .login(&credentials("a@h.com", "wrong", Role::Patient))
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Invalid login credentials"));
    assert!(h.controller.user().is_none());
    assert_eq!(h.controller.phase(), AuthPhase::Unauthenticated);
    assert!(!h.controller.is_loading());
}

#[tokio::test]
async fn profile_role_wins_over_selected_role() {
    let h = harness().await;

    let outcome = h
        .controller
        .login(&credentials("sarah@h.com", "staffpass", Role::Patient))
        .await;

    assert!(outcome.success);
    assert_eq!(h.controller.user().unwrap().role, Role::HospitalStaff);
}

#[tokio::test]
async fn login_without_profile_fails_and_signs_out() {
    let h = harness().await;
    h.store.fail_profile_fetch.store(true, Ordering::SeqCst);

    let outcome = h
        .controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;

    assert!(!outcome.success);
    assert!(h.controller.user().is_none());
    assert_eq!(h.store.sign_out_calls.load(Ordering::SeqCst), 1);
    assert!(h.store.current_session().await.unwrap().is_none());
}

#[tokio::test]
async fn logout_closes_sessions_and_clears_user() {
    let h = harness().await;
    h.controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;
    let user_id = h.controller.user().unwrap().id;

    let outcome = h.controller.logout().await;

    assert!(outcome.is_clean());
    assert!(h.controller.user().is_none());
    assert_eq!(h.controller.phase(), AuthPhase::Unauthenticated);
    let sessions = h.backend.login_sessions_for(&user_id);
    assert!(!sessions.is_empty());
    assert!(sessions.iter().all(|s| !s.is_active && s.logout_time.is_some()));
}

#[tokio::test]
async fn logout_still_signs_out_when_session_close_fails() {
    let h = harness().await;
    h.controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;
    let user_id = h.controller.user().unwrap().id;
    h.store.fail_close_sessions.store(true, Ordering::SeqCst);

    let outcome = h.controller.logout().await;

    assert!(!outcome.session_closed);
    assert!(outcome.signed_out);
    assert!(h.controller.user().is_none());
    assert!(h.store.current_session().await.unwrap().is_none());
    // The stored history still shows the session as open.
    assert!(h.backend.login_sessions_for(&user_id)[0].is_active);
}

#[tokio::test]
async fn logout_clears_user_when_sign_out_fails() {
    let h = harness().await;
    h.controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;
    h.store.fail_sign_out.store(true, Ordering::SeqCst);

    let outcome = h.controller.logout().await;

    assert!(outcome.session_closed);
    assert!(!outcome.signed_out);
    assert!(h.controller.user().is_none());
}

#[tokio::test]
async fn logout_without_user_touches_nothing() {
    let backend = InMemoryBackend::from_seed(&[patient_seed()]);
    let store = Arc::new(FlakyStore::new(backend.connect()));
    let controller = AuthController::new(store.clone(), Arc::new(StaticIp::unknown()));

    let outcome = controller.logout().await;

    assert!(outcome.is_clean());
    assert_eq!(controller.phase(), AuthPhase::Initializing);
    assert!(controller.is_loading());
    assert_eq!(store.sign_out_calls.load(Ordering::SeqCst), 0);

    controller.initialize().await;
    controller.logout().await;
    assert_eq!(controller.phase(), AuthPhase::Unauthenticated);
    assert_eq!(store.sign_out_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_creates_profile_without_logging_in() {
    let h = harness().await;
    let data = RegisterData {
        email: "new@h.com".to_string(),
        password: "longenough".to_string(),
        first_name: "New".to_string(),
        last_name: "Person".to_string(),
        phone: Some("(555) 222-3333".to_string()),
        role: Role::Patient,
        department: None,
        specialization: None,
    };

    let outcome = h.controller.register(&data).await;

    assert!(outcome.success);
    assert!(h.controller.user().is_none());
    assert_eq!(h.controller.phase(), AuthPhase::Unauthenticated);

    let login = h
        .controller
        .login(&credentials("new@h.com", "longenough", Role::Patient))
        .await;
    assert!(login.success);
    let user = h.controller.user().unwrap();
    assert!(user.is_active);
    assert_eq!(user.phone.as_deref(), Some("(555) 222-3333"));
}

#[tokio::test]
async fn register_reports_store_rejection() {
    let h = harness().await;
    let data = RegisterData {
        email: "a@h.com".to_string(),
        password: "longenough".to_string(),
        first_name: "Dup".to_string(),
        last_name: "Licate".to_string(),
        phone: None,
        role: Role::Patient,
        department: None,
        specialization: None,
    };

    let outcome = h.controller.register(&data).await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("User already registered"));
}

#[tokio::test]
async fn update_profile_requires_user() {
    let h = harness().await;
    let patch = ProfilePatch {
        first_name: Some("Changed".to_string()),
        ..Default::default()
    };

    let outcome = h.controller.update_profile(&patch).await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("No user logged in"));
    assert_eq!(h.store.profile_writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_profile_reloads_user() {
    let h = harness().await;
    h.controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;
    let before = h.controller.user().unwrap();

    let outcome = h
        .controller
        .update_profile(&ProfilePatch {
            phone: Some("(555) 999-0000".to_string()),
            ..Default::default()
        })
        .await;

    assert!(outcome.success);
    let after = h.controller.user().unwrap();
    assert_eq!(after.phone.as_deref(), Some("(555) 999-0000"));
    assert_eq!(after.first_name, before.first_name);
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn update_profile_applies_locally_when_reload_fails() {
    let h = harness().await;
    h.controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;
    let user_id = h.controller.user().unwrap().id;
    h.store.fail_profile_fetch.store(true, Ordering::SeqCst);

    let outcome = h
        .controller
        .update_profile(&ProfilePatch {
            first_name: Some("Adele".to_string()),
            ..Default::default()
        })
        .await;

    assert!(outcome.success);
    assert_eq!(h.controller.user().unwrap().first_name, "Adele");
    assert_eq!(h.backend.profile(&user_id).unwrap().first_name, "Adele");
}

#[tokio::test]
async fn login_history_is_bounded_and_newest_first() {
    let h = harness().await;
    for _ in 0..12 {
        h.controller
            .login(&credentials("a@h.com", "secret", Role::Patient))
            .await;
    }

    let history = h.controller.login_history().await;

    assert_eq!(history.len(), LOGIN_HISTORY_LIMIT);
    assert!(history.windows(2).all(|w| w[0].login_time >= w[1].login_time));
    let user_id = h.controller.user().unwrap().id;
    assert!(history.iter().all(|s| s.user_id == user_id));
}

#[tokio::test]
async fn login_history_empty_without_user_or_on_error() {
    let h = harness().await;
    assert!(h.controller.login_history().await.is_empty());

    h.controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;
    h.store.fail_history.store(true, Ordering::SeqCst);
    assert!(h.controller.login_history().await.is_empty());
}

#[tokio::test]
async fn follows_sign_out_reported_by_store() {
    let h = harness().await;
    h.controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;
    assert_eq!(h.controller.phase(), AuthPhase::Authenticated);

    // Signed out through the store directly, bypassing the controller.
    h.store.inner.sign_out().await.unwrap();

    wait_for_phase(&h.controller, AuthPhase::Unauthenticated).await;
    assert!(h.controller.user().is_none());
}

#[tokio::test]
async fn follows_revoked_session() {
    let h = harness().await;
    h.controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;
    let user_id = h.controller.user().unwrap().id;

    h.backend.revoke_tokens(&user_id);
    assert!(h.store.current_session().await.unwrap().is_none());

    wait_for_phase(&h.controller, AuthPhase::Unauthenticated).await;
}

#[tokio::test]
async fn follows_sign_in_reported_by_store() {
    let h = harness().await;

    h.store.inner.sign_in("sarah@h.com", "staffpass").await.unwrap();

    wait_for_phase(&h.controller, AuthPhase::Authenticated).await;
    assert_eq!(h.controller.user().unwrap().email, "sarah@h.com");
}

#[tokio::test]
async fn sign_in_pending_during_logout_is_dropped() {
    let h = harness().await;
    h.controller
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;
    // Let the notification for Ada's own sign-in settle first.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let gate = h.store.profile_gate.lock().await;
    h.store.gate_profile_fetch.store(true, Ordering::SeqCst);
    h.store.fail_sign_out.store(true, Ordering::SeqCst);
    h.store.sign_in("sarah@h.com", "staffpass").await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), h.store.profile_fetch_waiting.notified())
        .await
        .expect("profile fetch never started");

    h.controller.logout().await;
    h.store.gate_profile_fetch.store(false, Ordering::SeqCst);
    drop(gate);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(h.controller.user().is_none());
    assert_eq!(h.controller.phase(), AuthPhase::Unauthenticated);
}

#[tokio::test]
async fn dropping_controller_unregisters_listener() {
    let backend = InMemoryBackend::from_seed(&[patient_seed()]);
    let store = Arc::new(backend.connect());
    let controller = AuthController::new(store.clone(), Arc::new(StaticIp::unknown()));
    assert_eq!(store.listener_count(), 0);

    controller.initialize().await;
    assert_eq!(store.listener_count(), 1);

    let handle = controller.clone();
    drop(controller);
    assert_eq!(store.listener_count(), 1);

    drop(handle);
    assert_eq!(store.listener_count(), 0);
}

#[tokio::test]
async fn contexts_do_not_share_users() {
    let backend = InMemoryBackend::from_seed(&[patient_seed(), staff_seed()]);
    let first = AuthController::new(Arc::new(backend.connect()), Arc::new(StaticIp::unknown()));
    let second = AuthController::new(Arc::new(backend.connect()), Arc::new(StaticIp::unknown()));
    first.initialize().await;
    second.initialize().await;

    first
        .login(&credentials("a@h.com", "secret", Role::Patient))
        .await;

    assert!(first.user().is_some());
    assert!(second.user().is_none());
}
