//! Client for a hosted Supabase project.
//!
//! Credentials and sessions go through the GoTrue endpoints under
//! `/auth/v1`; the `users` and `login_sessions` tables are read and written
//! through PostgREST under `/rest/v1`. Every request carries the project's
//! public API key; table requests made while signed in carry the session's
//! access token so row-level policies apply.

use async_trait::async_trait;
use carehub_core::{
    AuthenticatedUser, LoginSession, NewLoginSession, ProfilePatch, SessionStoreConfig,
};
use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::listeners::{ListenerRegistry, SessionListener, Subscription};
use crate::store::{AuthSession, SessionEvent, SessionQuery, SessionStore, SignUp};

/// Renew tokens this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 30;

const USERS_TABLE: &str = "users";
const LOGIN_SESSIONS_TABLE: &str = "login_sessions";

struct StoredSession {
    session: AuthSession,
    refresh_token: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    refresh_token: String,
    user: GoTrueUser,
}

#[derive(Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// GoTrue and PostgREST use different error bodies; take whichever field is set.
#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// One client context of a Supabase project.
pub struct SupabaseSessionStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    session: RwLock<Option<StoredSession>>,
    listeners: ListenerRegistry,
}

impl SupabaseSessionStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            session: RwLock::new(None),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Build a client from configuration.
    pub fn from_config(config: &SessionStoreConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Internal("session_store.url is not set".to_string()))?;
        let key = config
            .resolve_anon_key()
            .ok_or_else(|| StoreError::Internal("session_store API key is not set".to_string()))?;
        Ok(Self::new(url, key))
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Access token of the current session, or the API key when signed out.
    async fn bearer(&self) -> String {
        match self.session.read().await.as_ref() {
            Some(stored) => stored.session.access_token.clone(),
            None => self.api_key.clone(),
        }
    }

    async fn request(&self, method: Method, url: String) -> RequestBuilder {
        let bearer = self.bearer().await;
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    async fn parse<R: DeserializeOwned>(resp: Response) -> Result<R, StoreError> {
        let resp = Self::check(resp).await?;
        resp.json::<R>()
            .await
            .map_err(|e| StoreError::Decode(format!("response body: {}", e)))
    }

    async fn check(resp: Response) -> Result<Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(rejection(status, &body))
    }

    async fn grant(&self, grant_type: &str, body: Value) -> Result<TokenResponse, StoreError> {
        let resp = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;
        Self::parse(resp).await
    }

    async fn store_tokens(&self, tokens: TokenResponse, fallback_email: &str) -> AuthSession {
        let session = AuthSession {
            user_id: tokens.user.id,
            email: tokens.user.email.unwrap_or_else(|| fallback_email.to_string()),
            access_token: tokens.access_token,
            expires_at: tokens
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        };
        *self.session.write().await = Some(StoredSession {
            session: session.clone(),
            refresh_token: tokens.refresh_token,
        });
        session
    }

    async fn clear_session(&self) -> Option<StoredSession> {
        self.session.write().await.take()
    }
}

fn rejection(status: StatusCode, body: &str) -> StoreError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    if status == StatusCode::BAD_REQUEST && parsed.error.as_deref() == Some("invalid_grant") {
        return StoreError::InvalidCredentials;
    }
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });
    if message == "Invalid login credentials" {
        return StoreError::InvalidCredentials;
    }
    StoreError::Rejected {
        status: status.as_u16(),
        message,
    }
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl SessionStore for SupabaseSessionStore {
    async fn current_session(&self) -> Result<Option<AuthSession>, StoreError> {
        let (session, refresh_token) = match self.session.read().await.as_ref() {
            Some(stored) => (stored.session.clone(), stored.refresh_token.clone()),
            None => return Ok(None),
        };

        if !session.is_expired(Utc::now() + Duration::seconds(REFRESH_MARGIN_SECS)) {
            return Ok(Some(session));
        }

        debug!(user_id = %session.user_id, "Refreshing access token");
        match self
            .grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
        {
            Ok(tokens) => {
                let fresh = self.store_tokens(tokens, &session.email).await;
                self.listeners.notify(&SessionEvent::TokenRefreshed {
                    user_id: fresh.user_id.clone(),
                });
                Ok(Some(fresh))
            }
            Err(e) if e.is_transient() => Err(e),
            Err(e) => {
                warn!(user_id = %session.user_id, error = %e, "Token refresh rejected; session ended");
                self.clear_session().await;
                self.listeners.notify(&SessionEvent::SignedOut);
                Ok(None)
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let tokens = self
            .grant("password", json!({ "email": email, "password": password }))
            .await?;
        let session = self.store_tokens(tokens, email).await;
        self.listeners.notify(&SessionEvent::SignedIn {
            user_id: session.user_id.clone(),
        });
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, StoreError> {
        let resp = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: Value = Self::parse(resp).await?;

        // With email confirmation disabled the service answers with a full
        // token grant; otherwise only the created user comes back.
        if body.get("access_token").is_some() {
            let tokens: TokenResponse = serde_json::from_value(body)?;
            let session = self.store_tokens(tokens, email).await;
            self.listeners.notify(&SessionEvent::SignedIn {
                user_id: session.user_id.clone(),
            });
            return Ok(SignUp {
                user_id: session.user_id.clone(),
                session: Some(session),
            });
        }

        let user_id = body
            .get("id")
            .or_else(|| body.pointer("/user/id"))
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Decode("signup response has no user id".to_string()))?;
        Ok(SignUp {
            user_id: user_id.to_string(),
            session: None,
        })
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        let stored = self.clear_session().await;
        self.listeners.notify(&SessionEvent::SignedOut);

        let Some(stored) = stored else {
            return Ok(());
        };
        let resp = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(&stored.session.access_token)
            .send()
            .await?;
        match Self::check(resp).await {
            Ok(_) => Ok(()),
            // Token already invalid on the server; nothing left to revoke.
            Err(StoreError::Rejected { status, .. }) if status == 401 || status == 404 => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn subscribe(&self, listener: SessionListener) -> Subscription {
        self.listeners.register(listener)
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<AuthenticatedUser, StoreError> {
        let resp = self
            .request(Method::GET, self.rest_url(USERS_TABLE))
            .await
            .query(&[("id", eq(user_id).as_str()), ("select", "*")])
            .send()
            .await?;
        let rows: Vec<AuthenticatedUser> = Self::parse(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("profile for user '{}'", user_id)))
    }

    async fn insert_profile(&self, profile: &AuthenticatedUser) -> Result<(), StoreError> {
        let resp = self
            .request(Method::POST, self.rest_url(USERS_TABLE))
            .await
            .header("Prefer", "return=minimal")
            .json(profile)
            .send()
            .await?;
        Self::check(resp).await.map(|_| ())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut body = serde_json::to_value(patch)?;
        if let Value::Object(fields) = &mut body {
            fields.insert("updatedAt".to_string(), json!(updated_at));
        }

        let resp = self
            .request(Method::PATCH, self.rest_url(USERS_TABLE))
            .await
            .query(&[("id", eq(user_id))])
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?;
        Self::check(resp).await.map(|_| ())
    }

    async fn touch_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let resp = self
            .request(Method::PATCH, self.rest_url(USERS_TABLE))
            .await
            .query(&[("id", eq(user_id))])
            .header("Prefer", "return=minimal")
            .json(&json!({ "lastLogin": at }))
            .send()
            .await?;
        Self::check(resp).await.map(|_| ())
    }

    async fn insert_login_session(&self, session: NewLoginSession) -> Result<LoginSession, StoreError> {
        let resp = self
            .request(Method::POST, self.rest_url(LOGIN_SESSIONS_TABLE))
            .await
            .header("Prefer", "return=representation")
            .json(&session)
            .send()
            .await?;
        let rows: Vec<LoginSession> = Self::parse(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }

    async fn close_active_sessions(&self, user_id: &str, at: DateTime<Utc>) -> Result<usize, StoreError> {
        let resp = self
            .request(Method::PATCH, self.rest_url(LOGIN_SESSIONS_TABLE))
            .await
            .query(&[("userId", eq(user_id)), ("isActive", eq("true"))])
            .header("Prefer", "return=representation")
            .json(&json!({ "logoutTime": at, "isActive": false }))
            .send()
            .await?;
        let rows: Vec<LoginSession> = Self::parse(resp).await?;
        Ok(rows.len())
    }

    async fn list_login_sessions(&self, query: &SessionQuery) -> Result<Vec<LoginSession>, StoreError> {
        let mut params = vec![
            ("userId", eq(&query.user_id)),
            ("select", "*".to_string()),
            (
                "order",
                if query.newest_first {
                    "loginTime.desc"
                } else {
                    "loginTime.asc"
                }
                .to_string(),
            ),
        ];
        if query.active_only {
            params.push(("isActive", eq("true")));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let resp = self
            .request(Method::GET, self.rest_url(LOGIN_SESSIONS_TABLE))
            .await
            .query(&params)
            .send()
            .await?;
        Self::parse(resp).await
    }
}
