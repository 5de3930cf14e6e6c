//! Dashboard configuration.
//!
//! This module defines configuration for the web dashboard.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the dashboard HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Host to bind the dashboard to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name of the cookie that identifies a browser session.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the session cookie `Secure` (only sent over HTTPS).
    #[serde(default)]
    pub secure_cookies: bool,

    /// Seconds a signed-in browser session may sit unused before it is
    /// dropped. Also the session cookie's `Max-Age`.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cookie_name: default_cookie_name(),
            secure_cookies: false,
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

impl DashboardConfig {
    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_session_idle_secs() -> u64 {
    86400
}

fn default_cookie_name() -> String {
    "carehub_session".to_string()
}
