//! Error types for the session crate.

use thiserror::Error;

/// Errors reported by a session store client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Email/password pair was not accepted.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// The operation needs a signed-in session.
    #[error("no active session")]
    NotAuthenticated,

    /// A record was not found.
    #[error("{0} not found")]
    NotFound(String),

    /// The service answered with an error status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether the failure is a network/service problem rather than a user
    /// error. Transient failures are logged; user errors are shown.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Network(_) | StoreError::Decode(_) | StoreError::Internal(_) => true,
            StoreError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_are_not_transient() {
        assert!(!StoreError::InvalidCredentials.is_transient());
        assert!(
            !StoreError::Rejected {
                status: 422,
                message: "User already registered".to_string()
            }
            .is_transient()
        );
        assert!(
            StoreError::Rejected {
                status: 503,
                message: "unavailable".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn rejected_displays_service_message() {
        let err = StoreError::Rejected {
            status: 400,
            message: "Password should be at least 6 characters".to_string(),
        };
        assert_eq!(err.to_string(), "Password should be at least 6 characters");
    }
}
