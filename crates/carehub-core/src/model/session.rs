//! Login session records (rows of the `login_sessions` table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One login/logout interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    pub id: String,
    pub user_id: String,
    pub login_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logout_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub is_active: bool,
}

impl LoginSession {
    /// Mark the session as ended.
    pub fn close(&mut self, at: DateTime<Utc>) {
        self.logout_time = Some(at);
        self.is_active = false;
    }

    /// Coarse device description derived from the user agent.
    pub fn device_label(&self) -> &'static str {
        let Some(agent) = self.user_agent.as_deref() else {
            return "Unknown Device";
        };
        if agent.contains("Mobile") {
            "Mobile Device"
        } else if agent.contains("Chrome") {
            "Chrome Browser"
        } else if agent.contains("Firefox") {
            "Firefox Browser"
        } else if agent.contains("Safari") {
            "Safari Browser"
        } else {
            "Unknown Device"
        }
    }
}

/// Insert payload for a new login session. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoginSession {
    pub user_id: String,
    pub login_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub is_active: bool,
}

impl NewLoginSession {
    pub fn started(user_id: impl Into<String>, ip_address: String, user_agent: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            login_time: Utc::now(),
            ip_address: Some(ip_address),
            user_agent,
            is_active: true,
        }
    }

    /// Materialize the stored row.
    pub fn into_session(self, id: impl Into<String>) -> LoginSession {
        LoginSession {
            id: id.into(),
            user_id: self.user_id,
            login_time: self.login_time,
            logout_time: None,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            is_active: self.is_active,
        }
    }
}
