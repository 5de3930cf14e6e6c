//! Query strings and form bodies accepted by the dashboard.

use carehub_core::{LoginCredentials, ProfilePatch, RegisterData, Role};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

// =============================================================================
// Page queries
// =============================================================================

/// Query of `GET /`: the tab plus every list filter and a one-shot notice.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub tab: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Query of the entry screen.
#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: String,
}

impl LoginForm {
    pub fn into_credentials(self) -> Result<LoginCredentials, DashboardError> {
        let role = parse_role(&self.role)?;
        Ok(LoginCredentials {
            email: self.email.trim().to_string(),
            password: self.password,
            role,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl RegisterForm {
    /// Check the form and build the registration. Errors are user-facing.
    pub fn into_registration(self) -> Result<RegisterData, String> {
        let role = self.role.parse::<Role>().map_err(|_| "Please select a role".to_string())?;
        if self.password != self.confirm_password {
            return Err("Passwords do not match".to_string());
        }
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err("First and last name are required".to_string());
        }
        let staff_only = |v: Option<String>| match role {
            Role::HospitalStaff => non_empty(v),
            Role::Patient => None,
        };
        Ok(RegisterData {
            email: self.email.trim().to_string(),
            password: self.password,
            first_name,
            last_name,
            phone: non_empty(self.phone),
            role,
            department: staff_only(self.department),
            specialization: staff_only(self.specialization),
        })
    }
}

/// Body of `POST /profile`. Fields absent from the form stay untouched;
/// present but blank optional fields are cleared.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl From<ProfileForm> for ProfilePatch {
    fn from(form: ProfileForm) -> Self {
        let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string());
        ProfilePatch {
            first_name: non_empty(form.first_name),
            last_name: non_empty(form.last_name),
            phone: trimmed(form.phone),
            department: trimmed(form.department),
            specialization: trimmed(form.specialization),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_role(raw: &str) -> Result<Role, DashboardError> {
    raw.parse()
        .map_err(|e: carehub_core::UnknownLabel| DashboardError::InvalidRequest(e.to_string()))
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
}
