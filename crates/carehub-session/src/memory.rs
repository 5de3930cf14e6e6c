//! In-process session store.
//!
//! [`InMemoryBackend`] plays the role of the remote service: it owns the
//! accounts, the `users` profile rows, the `login_sessions` rows and the
//! issued tokens. Each browser context gets its own [`InMemorySessionStore`]
//! client via [`InMemoryBackend::connect`], holding that context's current
//! session and listeners.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use carehub_core::{
    AuthenticatedUser, LoginSession, NewLoginSession, ProfilePatch, RegisterData, SeedUser,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::listeners::{ListenerRegistry, SessionListener, Subscription};
use crate::store::{AuthSession, SessionEvent, SessionQuery, SessionStore, SignUp};

struct Account {
    user_id: String,
    password: String,
}

#[derive(Default)]
struct BackendData {
    /// Keyed by lowercased email.
    accounts: HashMap<String, Account>,
    profiles: HashMap<String, AuthenticatedUser>,
    login_sessions: Vec<LoginSession>,
    /// Issued access token -> user id.
    tokens: HashMap<String, String>,
}

/// Shared state of the in-memory service.
#[derive(Default)]
pub struct InMemoryBackend {
    data: Mutex<BackendData>,
    next_session_id: AtomicU64,
    accept_any_password: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a backend with the given accounts.
    pub fn from_seed(seed: &[SeedUser]) -> Arc<Self> {
        let backend = Self::new();
        for user in seed {
            backend.seed_user(user);
        }
        info!(accounts = seed.len(), "Seeded in-memory session store");
        backend
    }

    /// Create an account and its profile row. Returns the user id.
    pub fn seed_user(&self, seed: &SeedUser) -> String {
        let user_id = Uuid::new_v4().to_string();
        let profile = AuthenticatedUser::from_registration(
            user_id.clone(),
            &RegisterData {
                email: seed.email.clone(),
                password: seed.password.clone(),
                first_name: seed.first_name.clone(),
                last_name: seed.last_name.clone(),
                phone: seed.phone.clone(),
                role: seed.role,
                department: seed.department.clone(),
                specialization: seed.specialization.clone(),
            },
            Utc::now(),
        );

        let mut data = self.lock();
        data.accounts.insert(
            seed.email.to_ascii_lowercase(),
            Account {
                user_id: user_id.clone(),
                password: seed.password.clone(),
            },
        );
        data.profiles.insert(user_id.clone(), profile);
        user_id
    }

    /// Accept any password for known accounts.
    pub fn set_accept_any_password(&self, accept: bool) {
        self.accept_any_password.store(accept, Ordering::SeqCst);
    }

    /// Open a new client context against this backend.
    pub fn connect(self: &Arc<Self>) -> InMemorySessionStore {
        InMemorySessionStore {
            backend: self.clone(),
            current: Mutex::new(None),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn profile(&self, user_id: &str) -> Option<AuthenticatedUser> {
        self.lock().profiles.get(user_id).cloned()
    }

    /// All recorded login sessions of a user, oldest first.
    pub fn login_sessions_for(&self, user_id: &str) -> Vec<LoginSession> {
        self.lock()
            .login_sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Invalidate every token issued to a user. Clients holding one lose
    /// their session on the next [`SessionStore::current_session`] call.
    pub fn revoke_tokens(&self, user_id: &str) -> usize {
        let mut data = self.lock();
        let before = data.tokens.len();
        data.tokens.retain(|_, owner| owner != user_id);
        before - data.tokens.len()
    }

    fn lock(&self) -> MutexGuard<'_, BackendData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue_token(&self, user_id: &str, email: &str) -> AuthSession {
        let token = Uuid::new_v4().simple().to_string();
        self.lock().tokens.insert(token.clone(), user_id.to_string());
        AuthSession {
            user_id: user_id.to_string(),
            email: email.to_string(),
            access_token: token,
            expires_at: None,
        }
    }

    fn token_valid(&self, token: &str) -> bool {
        self.lock().tokens.contains_key(token)
    }

    fn drop_token(&self, token: &str) {
        self.lock().tokens.remove(token);
    }
}

/// One client context of an [`InMemoryBackend`].
pub struct InMemorySessionStore {
    backend: Arc<InMemoryBackend>,
    current: Mutex<Option<AuthSession>>,
    listeners: ListenerRegistry,
}

impl InMemorySessionStore {
    pub fn backend(&self) -> &Arc<InMemoryBackend> {
        &self.backend
    }

    /// Number of registered session listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn current(&self) -> MutexGuard<'_, Option<AuthSession>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_session(&self) -> Result<(), StoreError> {
        match self.current().as_ref() {
            Some(session) if self.backend.token_valid(&session.access_token) => Ok(()),
            _ => Err(StoreError::NotAuthenticated),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn current_session(&self) -> Result<Option<AuthSession>, StoreError> {
        let revoked = {
            let mut current = self.current();
            let stale = current
                .as_ref()
                .is_some_and(|session| !self.backend.token_valid(&session.access_token));
            if stale {
                *current = None;
            }
            stale
        };

        if revoked {
            debug!("Session token revoked");
            self.listeners.notify(&SessionEvent::SignedOut);
            return Ok(None);
        }
        Ok(self.current().clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let user_id = {
            let data = self.backend.lock();
            let account = data
                .accounts
                .get(&email.to_ascii_lowercase())
                .ok_or(StoreError::InvalidCredentials)?;
            if account.password != password
                && !self.backend.accept_any_password.load(Ordering::SeqCst)
            {
                return Err(StoreError::InvalidCredentials);
            }
            account.user_id.clone()
        };

        let session = self.backend.issue_token(&user_id, email);
        let previous = self.current().replace(session.clone());
        if let Some(previous) = previous {
            self.backend.drop_token(&previous.access_token);
        }

        self.listeners.notify(&SessionEvent::SignedIn { user_id });
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, StoreError> {
        if password.len() < 6 {
            return Err(StoreError::Rejected {
                status: 422,
                message: "Password should be at least 6 characters".to_string(),
            });
        }

        let mut data = self.backend.lock();
        let key = email.to_ascii_lowercase();
        if data.accounts.contains_key(&key) {
            return Err(StoreError::Rejected {
                status: 422,
                message: "User already registered".to_string(),
            });
        }

        let user_id = Uuid::new_v4().to_string();
        data.accounts.insert(
            key,
            Account {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        Ok(SignUp {
            user_id,
            session: None,
        })
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        if let Some(session) = self.current().take() {
            self.backend.drop_token(&session.access_token);
        }
        self.listeners.notify(&SessionEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self, listener: SessionListener) -> Subscription {
        self.listeners.register(listener)
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<AuthenticatedUser, StoreError> {
        self.backend
            .profile(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("profile for user '{}'", user_id)))
    }

    async fn insert_profile(&self, profile: &AuthenticatedUser) -> Result<(), StoreError> {
        let mut data = self.backend.lock();
        if data.profiles.contains_key(&profile.id) {
            return Err(StoreError::Rejected {
                status: 409,
                message: format!("profile for user '{}' already exists", profile.id),
            });
        }
        data.profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.require_session()?;
        let mut data = self.backend.lock();
        let profile = data
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("profile for user '{}'", user_id)))?;
        profile.apply(patch, updated_at);
        Ok(())
    }

    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut data = self.backend.lock();
        let profile = data
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("profile for user '{}'", user_id)))?;
        profile.last_login = Some(at);
        Ok(())
    }

    async fn insert_login_session(&self, session: NewLoginSession) -> Result<LoginSession, StoreError> {
        let id = self.backend.next_session_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = session.into_session(id.to_string());
        self.backend.lock().login_sessions.push(row.clone());
        Ok(row)
    }

    async fn close_active_sessions(&self, user_id: &str, at: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut data = self.backend.lock();
        let mut closed = 0;
        for session in data
            .login_sessions
            .iter_mut()
            .filter(|s| s.user_id == user_id && s.is_active)
        {
            session.close(at);
            closed += 1;
        }
        Ok(closed)
    }

    async fn list_login_sessions(&self, query: &SessionQuery) -> Result<Vec<LoginSession>, StoreError> {
        Ok(query.apply(&self.backend.lock().login_sessions))
    }
}
