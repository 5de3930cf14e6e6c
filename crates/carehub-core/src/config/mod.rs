//! Configuration types for CareHub.
//!
//! Configuration is loaded from a single YAML file (`carehub.yaml` by
//! default). Every section and field is optional; a missing file yields the
//! defaults, which run the dashboard against an in-memory session store with
//! two demo accounts.

pub mod dashboard;
pub mod session_store;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use dashboard::DashboardConfig;
pub use session_store::{SeedUser, SessionStoreConfig, StoreBackend};

/// Complete CareHub configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarehubConfig {
    /// Dashboard HTTP server.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Session store backend.
    #[serde(default)]
    pub session_store: SessionStoreConfig,

    /// Client IP lookup used when recording login sessions.
    #[serde(default)]
    pub ip_lookup: IpLookupConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Client IP lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpLookupConfig {
    /// When disabled, sessions record the "Unknown" placeholder.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON endpoint answering `{"ip": "..."}`.
    #[serde(default = "default_ip_lookup_url")]
    pub url: String,
}

impl Default for IpLookupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_ip_lookup_url(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ip_lookup_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CarehubConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.port == 0 {
            return Err(ConfigError::Config("dashboard.port must be non-zero".to_string()));
        }
        if self.dashboard.cookie_name.trim().is_empty() {
            return Err(ConfigError::Config("dashboard.cookie_name must not be empty".to_string()));
        }
        if self.dashboard.session_idle_secs == 0 {
            return Err(ConfigError::Config(
                "dashboard.session_idle_secs must be non-zero".to_string(),
            ));
        }

        if self.session_store.backend == StoreBackend::Supabase {
            match self.session_store.url.as_deref() {
                Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
                Some(url) => {
                    return Err(ConfigError::Config(format!(
                        "session_store.url must be an http(s) URL, got '{}'",
                        url
                    )));
                }
                None => {
                    return Err(ConfigError::Config(
                        "session_store.url is required for the supabase backend".to_string(),
                    ));
                }
            }
            if self.session_store.resolve_anon_key().is_none() {
                return Err(ConfigError::Config(
                    "session_store.anon_key or anon_key_env is required for the supabase backend"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}
