//! Error taxonomy for remote calls and token storage.

use thiserror::Error;

/// Classified failure of a remote API call.
///
/// `message` fields hold the server-supplied `message`, when the response
/// carried one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Malformed request (400/422). Shown next to the offending input, never retried.
    #[error("request rejected as invalid (status {status})")]
    Validation {
        status: u16,
        message: Option<String>,
    },

    /// Unauthenticated or unauthorized (401/403). Triggers forced de-authentication.
    #[error("authorization failed (status {status})")]
    AuthFailure {
        status: u16,
        message: Option<String>,
    },

    /// Server fault or network trouble. Retried only when the user asks again.
    #[error("transient failure: {detail}")]
    Transient {
        detail: String,
        message: Option<String>,
    },

    /// Any other rejection, e.g. a duplicate email on register.
    #[error("request rejected (status {status})")]
    Business {
        status: u16,
        message: Option<String>,
    },
}

impl ApiError {
    pub fn transient(detail: impl Into<String>) -> Self {
        Self::Transient {
            detail: detail.into(),
            message: None,
        }
    }

    /// Classifies a non-2xx status and optional server message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 | 403 => Self::AuthFailure { status, message },
            400 | 422 => Self::Validation { status, message },
            500..=599 => Self::Transient {
                detail: format!("server error (status {status})"),
                message,
            },
            _ => Self::Business { status, message },
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure { .. })
    }

    /// The server's own message, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Validation { message, .. }
            | Self::AuthFailure { message, .. }
            | Self::Transient { message, .. }
            | Self::Business { message, .. } => message.as_deref(),
        }
    }

    /// Text to show the operator: the server message, else `default`.
    pub fn user_message(&self, default: &str) -> String {
        self.server_message().unwrap_or(default).to_owned()
    }
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a token storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("token storage is corrupt: {0}")]
    Format(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ApiError::from_status(401, None).is_auth_failure());
        assert!(ApiError::from_status(403, None).is_auth_failure());
        assert!(matches!(
            ApiError::from_status(400, None),
            ApiError::Validation { status: 400, .. }
        ));
        assert!(matches!(
            ApiError::from_status(422, None),
            ApiError::Validation { status: 422, .. }
        ));
        assert!(matches!(
            ApiError::from_status(503, None),
            ApiError::Transient { .. }
        ));
        assert!(matches!(
            ApiError::from_status(409, None),
            ApiError::Business { status: 409, .. }
        ));
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::from_status(409, Some("Email already registered".to_owned()));
        assert_eq!(err.user_message("Registration failed"), "Email already registered");

        let err = ApiError::transient("connection refused");
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn test_auth_failure_keeps_server_message() {
        let err = ApiError::from_status(401, Some("Invalid email or password".to_owned()));
        assert_eq!(err.user_message("Login failed"), "Invalid email or password");
        assert_eq!(err.to_string(), "authorization failed (status 401)");
    }
}
