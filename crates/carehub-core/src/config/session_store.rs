//! Session store configuration.
//!
//! Selects the backend that provides credential verification, session tokens
//! and the `users` / `login_sessions` tables.

use serde::{Deserialize, Serialize};

use crate::model::Role;

/// Configuration for the session store client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStoreConfig {
    /// Which backend to use.
    #[serde(default)]
    pub backend: StoreBackend,

    /// Project URL of the hosted backend (supabase backend only).
    #[serde(default)]
    pub url: Option<String>,

    /// Public API key.
    #[serde(default)]
    pub anon_key: Option<String>,

    /// Environment variable containing the API key.
    #[serde(default)]
    pub anon_key_env: Option<String>,

    /// Client descriptor recorded as the user agent of login sessions.
    #[serde(default = "default_client_descriptor")]
    pub client_descriptor: String,

    /// Accounts created at startup (memory backend only).
    #[serde(default = "default_seed_users")]
    pub seed_users: Vec<SeedUser>,
}

/// Session store backend type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store, lost on restart.
    #[default]
    Memory,
    /// Hosted auth + REST tables.
    Supabase,
}

/// An account seeded into the memory backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: None,
            anon_key: None,
            anon_key_env: None,
            client_descriptor: default_client_descriptor(),
            seed_users: default_seed_users(),
        }
    }
}

impl SessionStoreConfig {
    /// Get the API key, checking anon_key_env first.
    pub fn resolve_anon_key(&self) -> Option<String> {
        if let Some(env_var) = &self.anon_key_env
            && let Ok(key) = std::env::var(env_var) {
                return Some(key);
            }
        self.anon_key.clone()
    }
}

fn default_client_descriptor() -> String {
    concat!("carehub-dashboard/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_seed_users() -> Vec<SeedUser> {
    vec![
        SeedUser {
            email: "patient@carehub.local".to_string(),
            password: "patient123".to_string(),
            role: Role::Patient,
            first_name: "Patient".to_string(),
            last_name: "A".to_string(),
            phone: Some("(555) 123-4567".to_string()),
            department: None,
            specialization: None,
        },
        SeedUser {
            email: "staff@carehub.local".to_string(),
            password: "staff123".to_string(),
            role: Role::HospitalStaff,
            first_name: "Sarah".to_string(),
            last_name: "Wilson".to_string(),
            phone: Some("(555) 111-2222".to_string()),
            department: Some("Cardiology".to_string()),
            specialization: Some("Cardiovascular Surgery".to_string()),
        },
    ]
}
