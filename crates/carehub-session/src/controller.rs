//! The auth state controller.
//!
//! An [`AuthController`] is the single source of truth for who is logged in
//! within one client context. It restores a prior session at startup,
//! drives login/register/logout/profile updates against a [`SessionStore`],
//! records login sessions, and follows session changes the store reports on
//! its own (expiry, sign-out from elsewhere).
//!
//! State is published through a [`tokio::sync::watch`] channel: every
//! observer sees a consistent [`AuthSnapshot`] and is woken on each change.
//!
//! ```text
//!   Initializing ──restore──▶ Unauthenticated ◀──logout / SignedOut──┐
//!        │                        │                                 │
//!        └───restore──────────────┴──login / SignedIn──▶ Authenticated
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use carehub_core::{
    AuthenticatedUser, LoginCredentials, LoginSession, NewLoginSession, ProfilePatch,
    RegisterData,
};
use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::ip::IpLookup;
use crate::listeners::Subscription;
use crate::store::{SessionEvent, SessionQuery, SessionStore};

/// Maximum number of entries returned by [`AuthController::login_history`].
pub const LOGIN_HISTORY_LIMIT: usize = 10;

/// Lifecycle phase of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Session restore has not finished yet.
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// Point-in-time view of the controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    pub phase: AuthPhase,
    pub user: Option<AuthenticatedUser>,
    /// An operation is in flight.
    pub loading: bool,
}

impl AuthSnapshot {
    fn initial() -> Self {
        Self {
            phase: AuthPhase::Initializing,
            user: None,
            loading: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }
}

/// Result of a login, registration or profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    /// Human-readable reason, present on failure.
    pub error: Option<String>,
}

impl AuthOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Result of a logout.
///
/// Logout always clears the local user. The two flags report whether the
/// remote steps succeeded; when either is false the stored session history
/// may disagree with the local state and a warning has been logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// Active login sessions were closed in the store.
    pub session_closed: bool,
    /// The store invalidated the session.
    pub signed_out: bool,
}

impl LogoutOutcome {
    pub fn is_clean(&self) -> bool {
        self.session_closed && self.signed_out
    }
}

struct ControllerInner {
    store: Arc<dyn SessionStore>,
    ip_lookup: Arc<dyn IpLookup>,
    /// Recorded as the user agent of login sessions.
    client_descriptor: Option<String>,
    state: watch::Sender<AuthSnapshot>,
    initialized: AtomicBool,
    /// Bumped whenever the user is signed out; profile loads started under
    /// an older value are discarded.
    sign_out_generation: AtomicU64,
    subscription: Mutex<Option<Subscription>>,
}

/// Auth state of one client context.
///
/// Cloning yields another handle to the same state. The store listener is
/// unregistered when the last handle is dropped.
#[derive(Clone)]
pub struct AuthController {
    inner: Arc<ControllerInner>,
}

impl AuthController {
    pub fn new(store: Arc<dyn SessionStore>, ip_lookup: Arc<dyn IpLookup>) -> Self {
        Self::build(store, ip_lookup, None)
    }

    /// Like [`AuthController::new`], recording `descriptor` as the user
    /// agent of login sessions.
    pub fn with_client_descriptor(
        store: Arc<dyn SessionStore>,
        ip_lookup: Arc<dyn IpLookup>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self::build(store, ip_lookup, Some(descriptor.into()))
    }

    fn build(
        store: Arc<dyn SessionStore>,
        ip_lookup: Arc<dyn IpLookup>,
        client_descriptor: Option<String>,
    ) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::initial());
        Self {
            inner: Arc::new(ControllerInner {
                store,
                ip_lookup,
                client_descriptor,
                state,
                initialized: AtomicBool::new(false),
                sign_out_generation: AtomicU64::new(0),
                subscription: Mutex::new(None),
            }),
        }
    }

    /// Register for store session changes and restore any existing session.
    ///
    /// Leaves the `Initializing` phase exactly once; later calls are no-ops.
    pub async fn initialize(&self) {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            return;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.inner.store.subscribe(Arc::new(move |event: &SessionEvent| {
            let _ = tx.send(event.clone());
        }));
        *self
            .inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(subscription);
        tokio::spawn(follow_session_events(Arc::downgrade(&self.inner), rx));

        let user = match self.inner.store.current_session().await {
            Ok(Some(session)) => self.inner.load_profile(&session.user_id).await,
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Could not read existing session");
                None
            }
        };

        if let Some(user) = &user {
            info!(user_id = %user.id, role = %user.role, "Restored session");
        }
        self.inner.publish_user(user);
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver woken on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn phase(&self) -> AuthPhase {
        self.inner.state.borrow().phase
    }

    pub fn user(&self) -> Option<AuthenticatedUser> {
        self.inner.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Sign in, load the profile and record a login session.
    ///
    /// The profile's role is authoritative: a role selected at login that
    /// differs from it is logged and otherwise ignored.
    pub async fn login(&self, credentials: &LoginCredentials) -> AuthOutcome {
        self.inner.set_loading(true);
        let result = self.inner.try_login(credentials).await;

        match result {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "User logged in");
                self.inner.publish_user(Some(user));
                AuthOutcome::ok()
            }
            Err(e) => {
                warn!(email = %credentials.email, error = %e, "Login failed");
                self.inner.set_loading(false);
                AuthOutcome::failed(e.to_string())
            }
        }
    }

    /// Create an identity and its profile row.
    ///
    /// Does not log the new user in unless the store itself issued a
    /// session on sign-up.
    pub async fn register(&self, data: &RegisterData) -> AuthOutcome {
        self.inner.set_loading(true);
        let result = self.inner.try_register(data).await;
        self.inner.set_loading(false);

        match result {
            Ok(Some(user)) => {
                info!(user_id = %user.id, role = %user.role, "User registered and signed in");
                self.inner.publish_user(Some(user));
                AuthOutcome::ok()
            }
            Ok(None) => {
                info!(email = %data.email, role = %data.role, "User registered");
                AuthOutcome::ok()
            }
            Err(e) => {
                warn!(email = %data.email, error = %e, "Registration failed");
                AuthOutcome::failed(e.to_string())
            }
        }
    }

    /// Close the user's active login sessions, sign out, clear the user.
    ///
    /// The local user is cleared even when a remote step fails. Without a
    /// user this is a no-op: neither the store nor the state is touched.
    pub async fn logout(&self) -> LogoutOutcome {
        let Some(user_id) = self.user().map(|u| u.id) else {
            return LogoutOutcome {
                session_closed: true,
                signed_out: true,
            };
        };
        self.inner.sign_out_generation.fetch_add(1, Ordering::SeqCst);

        let session_closed = match self
            .inner
            .store
            .close_active_sessions(&user_id, Utc::now())
            .await
        {
            Ok(closed) => {
                debug!(user_id = %user_id, closed, "Closed login sessions");
                true
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to close login sessions");
                false
            }
        };

        let signed_out = match self.inner.store.sign_out().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Sign-out failed");
                false
            }
        };

        self.inner.publish_user(None);

        let outcome = LogoutOutcome {
            session_closed,
            signed_out,
        };
        if outcome.is_clean() {
            info!(user_id = %user_id, "User logged out");
        } else {
            warn!(
                session_closed,
                signed_out, "Logout incomplete; stored session state may be inconsistent"
            );
        }
        outcome
    }

    /// Write changed profile fields, then reload the profile.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> AuthOutcome {
        let Some(user) = self.user() else {
            return AuthOutcome::failed("No user logged in");
        };

        let now = Utc::now();
        if let Err(e) = self.inner.store.update_profile(&user.id, patch, now).await {
            warn!(user_id = %user.id, error = %e, "Profile update failed");
            return AuthOutcome::failed(e.to_string());
        }

        let refreshed = match self.inner.store.fetch_profile(&user.id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Profile reload failed; applying update locally");
                let mut local = user.clone();
                local.apply(patch, now);
                local
            }
        };

        info!(user_id = %user.id, "Profile updated");
        self.inner.replace_user_if_current(&user.id, refreshed);
        AuthOutcome::ok()
    }

    /// The current user's most recent login sessions, newest first.
    ///
    /// Empty when nobody is logged in or the store cannot be read.
    pub async fn login_history(&self) -> Vec<LoginSession> {
        let Some(user) = self.user() else {
            return Vec::new();
        };

        match self
            .inner
            .store
            .list_login_sessions(&SessionQuery::history(&user.id, LOGIN_HISTORY_LIMIT))
            .await
        {
            Ok(mut sessions) => {
                sessions.retain(|s| s.user_id == user.id);
                sessions.sort_by(|a, b| b.login_time.cmp(&a.login_time));
                sessions.truncate(LOGIN_HISTORY_LIMIT);
                sessions
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Failed to load login history");
                Vec::new()
            }
        }
    }
}

impl ControllerInner {
    fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }

    fn publish_user(&self, user: Option<AuthenticatedUser>) {
        self.state.send_modify(|s| {
            s.phase = if user.is_some() {
                AuthPhase::Authenticated
            } else {
                AuthPhase::Unauthenticated
            };
            s.user = user;
            s.loading = false;
        });
    }

    /// Replace the user only if the same identity is still logged in.
    fn replace_user_if_current(&self, user_id: &str, user: AuthenticatedUser) {
        self.state.send_if_modified(|s| match &s.user {
            Some(current) if current.id == user_id => {
                s.user = Some(user);
                true
            }
            _ => false,
        });
    }

    fn current_user_id(&self) -> Option<String> {
        self.state.borrow().user.as_ref().map(|u| u.id.clone())
    }

    async fn load_profile(&self, user_id: &str) -> Option<AuthenticatedUser> {
        match self.store.fetch_profile(user_id).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to load user profile");
                None
            }
        }
    }

    async fn try_login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedUser, StoreError> {
        let session = self
            .store
            .sign_in(&credentials.email, &credentials.password)
            .await?;

        let mut user = match self.store.fetch_profile(&session.user_id).await {
            Ok(user) => user,
            Err(e) => {
                // Do not leave a store session behind that no user owns.
                if let Err(sign_out) = self.store.sign_out().await {
                    warn!(error = %sign_out, "Sign-out after failed profile load failed");
                }
                return Err(e);
            }
        };

        if user.role != credentials.role {
            warn!(
                user_id = %user.id,
                requested = %credentials.role,
                actual = %user.role,
                "Login role differs from profile role; using profile role"
            );
        }

        self.record_login_session(&user.id).await;

        let now = Utc::now();
        match self.store.touch_last_login(&user.id, now).await {
            Ok(()) => user.last_login = Some(now),
            Err(e) => warn!(user_id = %user.id, error = %e, "Failed to update last login"),
        }
        Ok(user)
    }

    async fn record_login_session(&self, user_id: &str) {
        let ip_address = self.ip_lookup.client_ip().await;
        let session = NewLoginSession::started(user_id, ip_address, self.client_descriptor.clone());
        if let Err(e) = self.store.insert_login_session(session).await {
            warn!(user_id = %user_id, error = %e, "Failed to record login session");
        }
    }

    async fn try_register(&self, data: &RegisterData) -> Result<Option<AuthenticatedUser>, StoreError> {
        let created = self.store.sign_up(&data.email, &data.password).await?;
        let profile = AuthenticatedUser::from_registration(&created.user_id, data, Utc::now());
        self.store.insert_profile(&profile).await?;

        if created.session.is_none() {
            return Ok(None);
        }
        self.record_login_session(&profile.id).await;
        Ok(Some(profile))
    }

    async fn apply_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::SignedIn { user_id } => {
                if self.current_user_id().as_deref() == Some(user_id.as_str()) {
                    return;
                }
                let generation = self.sign_out_generation.load(Ordering::SeqCst);
                // Ignore notifications for sessions that have since ended.
                match self.store.current_session().await {
                    Ok(Some(session)) if session.user_id == user_id => {}
                    _ => return,
                }
                let Some(user) = self.load_profile(&user_id).await else {
                    return;
                };
                if self.sign_out_generation.load(Ordering::SeqCst) != generation {
                    debug!(user_id = %user_id, "Signed out while loading profile; ignoring sign-in");
                    return;
                }
                debug!(user_id = %user.id, "Session started elsewhere");
                self.publish_user(Some(user));
            }
            SessionEvent::SignedOut => {
                if self.current_user_id().is_some() {
                    self.sign_out_generation.fetch_add(1, Ordering::SeqCst);
                    info!("Session ended by the store");
                    self.publish_user(None);
                }
            }
            SessionEvent::TokenRefreshed { user_id } => {
                debug!(user_id = %user_id, "Session token refreshed");
            }
        }
    }
}

/// Apply store events until the channel closes or the controller is gone.
async fn follow_session_events(
    inner: Weak<ControllerInner>,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
) {
    while let Some(event) = events.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.apply_event(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot_is_loading() {
        let snapshot = AuthSnapshot::initial();
        assert_eq!(snapshot.phase, AuthPhase::Initializing);
        assert!(snapshot.loading);
        assert!(snapshot.user.is_none());
        assert!(!snapshot.is_authenticated());
    }

    #[test]
    fn outcomes() {
        assert!(AuthOutcome::ok().success);
        let failed = AuthOutcome::failed("Invalid login credentials");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("Invalid login credentials"));

        assert!(
            LogoutOutcome {
                session_closed: true,
                signed_out: true
            }
            .is_clean()
        );
        assert!(
            !LogoutOutcome {
                session_closed: false,
                signed_out: true
            }
            .is_clean()
        );
    }
}
