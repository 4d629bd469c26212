//! Error types shared by every BCET Connect layer
//!
//! Business-rule violations carry their message verbatim to the caller.
//! [`ConnectError::Unexpected`] keeps its detail for the server log only.

use connect_rbac::GateDenial;
use thiserror::Error;

/// Domain error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Missing, invalid or expired credential
    #[error("{0}")]
    Unauthenticated(String),

    /// Role or ownership denial
    #[error("{0}")]
    Forbidden(String),

    /// Resource id does not exist
    #[error("{0}")]
    NotFound(String),

    /// Resource existed but has been removed
    #[error("{0}")]
    Gone(String),

    /// Operation not permitted in the resource's current state
    #[error("{0}")]
    InvalidState(String),

    /// Duplicate action
    #[error("{0}")]
    Conflict(String),

    /// Malformed input; all field errors joined with ", "
    #[error("{0}")]
    ValidationFailed(String),

    /// Anything uncaught
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type for domain operations.
pub type ConnectResult<T> = Result<T, ConnectError>;

impl ConnectError {
    /// `"<label> not found"`
    pub fn not_found(label: &str) -> Self {
        ConnectError::NotFound(format!("{label} not found"))
    }

    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ConnectError::Unexpected(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ConnectError::Unauthenticated(_) => 401,
            ConnectError::Forbidden(_) => 403,
            ConnectError::NotFound(_) => 404,
            ConnectError::Gone(_) => 410,
            ConnectError::InvalidState(_) | ConnectError::ValidationFailed(_) => 400,
            ConnectError::Conflict(_) => 409,
            ConnectError::Unexpected(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectError::Unauthenticated(_) => "UNAUTHENTICATED",
            ConnectError::Forbidden(_) => "FORBIDDEN",
            ConnectError::NotFound(_) => "NOT_FOUND",
            ConnectError::Gone(_) => "GONE",
            ConnectError::InvalidState(_) => "INVALID_STATE",
            ConnectError::Conflict(_) => "CONFLICT",
            ConnectError::ValidationFailed(_) => "VALIDATION_FAILED",
            ConnectError::Unexpected(_) => "INTERNAL_ERROR",
        }
    }

    /// The message safe to show a client.
    pub fn public_message(&self) -> String {
        match self {
            ConnectError::Unexpected(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<GateDenial> for ConnectError {
    fn from(denial: GateDenial) -> Self {
        match denial {
            GateDenial::Unauthenticated => ConnectError::Unauthenticated(denial.to_string()),
            GateDenial::RoleMissing | GateDenial::Forbidden { .. } => {
                ConnectError::Forbidden(denial.to_string())
            }
        }
    }
}
