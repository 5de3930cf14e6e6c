//! The session store client contract.

use async_trait::async_trait;
use carehub_core::{AuthenticatedUser, LoginSession, NewLoginSession, ProfilePatch};
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::listeners::{SessionListener, Subscription};

/// An issued session for a signed-in identity.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
    /// `None` for sessions that never expire.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Result of creating an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUp {
    pub user_id: String,
    /// Present when the store signs the new identity in immediately.
    pub session: Option<AuthSession>,
}

/// Session-change notification delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: String },
    SignedOut,
    TokenRefreshed { user_id: String },
}

/// Query over the `login_sessions` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuery {
    pub user_id: String,
    /// Only sessions that have not been closed.
    pub active_only: bool,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Order by login time, newest first.
    pub newest_first: bool,
}

impl SessionQuery {
    /// The most recent `limit` sessions of a user, newest first.
    pub fn history(user_id: impl Into<String>, limit: usize) -> Self {
        Self {
            user_id: user_id.into(),
            active_only: false,
            limit: Some(limit),
            newest_first: true,
        }
    }

    /// Apply the query to an in-memory collection.
    pub fn apply<'a>(&self, sessions: impl IntoIterator<Item = &'a LoginSession>) -> Vec<LoginSession> {
        let mut results: Vec<LoginSession> = sessions
            .into_iter()
            .filter(|s| s.user_id == self.user_id)
            .filter(|s| !self.active_only || s.is_active)
            .cloned()
            .collect();

        if self.newest_first {
            results.sort_by(|a, b| b.login_time.cmp(&a.login_time));
        } else {
            results.sort_by(|a, b| a.login_time.cmp(&b.login_time));
        }
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
        results
    }
}

/// Client for the external identity service and its two tables,
/// `users` (profiles) and `login_sessions`.
///
/// One client represents one browser context: it holds at most one current
/// session and notifies its own listeners when that session changes.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The session held by this client, renewed if the service supports it.
    async fn current_session(&self) -> Result<Option<AuthSession>, StoreError>;

    /// Verify credentials and issue a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError>;

    /// Create a new identity.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, StoreError>;

    /// Invalidate the current session. The local session is dropped even
    /// when the remote call fails.
    async fn sign_out(&self) -> Result<(), StoreError>;

    /// Register a session-change listener. The listener stays registered
    /// until the returned [`Subscription`] is dropped or unsubscribed.
    fn subscribe(&self, listener: SessionListener) -> Subscription;

    async fn fetch_profile(&self, user_id: &str) -> Result<AuthenticatedUser, StoreError>;

    async fn insert_profile(&self, profile: &AuthenticatedUser) -> Result<(), StoreError>;

    /// Write the changed fields plus `updated_at`.
    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), StoreError>;

    async fn insert_login_session(&self, session: NewLoginSession) -> Result<LoginSession, StoreError>;

    /// Close every still-active session of a user. Returns how many closed.
    async fn close_active_sessions(&self, user_id: &str, at: DateTime<Utc>) -> Result<usize, StoreError>;

    async fn list_login_sessions(&self, query: &SessionQuery) -> Result<Vec<LoginSession>, StoreError>;
}
