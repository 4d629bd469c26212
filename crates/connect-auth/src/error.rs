//! Login and token failures
//!
//! Every variant a client can trigger renders as 401; only setup and
//! signing failures are server errors.

use connect_model::ConnectError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header
    #[error("Authorization token missing")]
    TokenMissing,

    #[error("Invalid or expired token")]
    TokenExpired,

    /// Detail goes to the debug log only
    #[error("Invalid or expired token")]
    InvalidToken(String),

    /// `sub` is not a user id
    #[error("Invalid token: {0} missing")]
    MissingClaim(String),

    /// Email or password did not match
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The token's subject no longer exists
    #[error("User not found")]
    UserNotFound,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Bad credentials and expired tokens are routine and stay at debug.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Internal(_) | AuthError::ConfigError(_))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::TokenMissing
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::InvalidCredentials
            | AuthError::MissingClaim(_)
            | AuthError::UserNotFound => 401,

            AuthError::ConfigError(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Stable code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenMissing => "TOKEN_MISSING",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::MissingClaim(_) => "MISSING_CLAIM",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<AuthError> for ConnectError {
    fn from(err: AuthError) -> Self {
        if err.is_server_error() {
            ConnectError::Unexpected(err.to_string())
        } else {
            ConnectError::Unauthenticated(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_do_not_leak_detail() {
        let err = AuthError::InvalidToken("InvalidSignature".into());
        assert_eq!(err.to_string(), "Invalid or expired token");
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_into_connect_error() {
        let err: ConnectError = AuthError::InvalidCredentials.into();
        assert_eq!(err, ConnectError::Unauthenticated("Invalid email or password".into()));

        let err: ConnectError = AuthError::MissingClaim("sub".into()).into();
        assert_eq!(err.status_code(), 401);

        let err: ConnectError = AuthError::Internal("rng".into()).into();
        assert!(err.is_server_error());
    }
}
