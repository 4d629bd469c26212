//! AI client errors
//!
//! None of these reach an API caller: the client logs them and serves the
//! fallback payload instead.

use thiserror::Error;

/// AI client error types.
#[derive(Debug, Error)]
pub enum AiError {
    /// No URL configured for the endpoint
    #[error("AI endpoint not configured: {0}")]
    NotConfigured(&'static str),

    /// HTTP request failed (connect, timeout, body)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("AI service error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        message: String,
    },

    /// The body was not the expected JSON
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),
}

/// Result type for AI calls.
pub type AiResult<T> = Result<T, AiError>;

impl AiError {
    /// Whether another attempt could succeed.
    ///
    /// Transport failures, 429 and 5xx are retried; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::RequestFailed(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            AiError::ApiError { status, .. } => *status == 429 || *status >= 500,
            AiError::NotConfigured(_) | AiError::InvalidResponse(_) => false,
        }
    }

    /// Get error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AiError::NotConfigured(_) => "AI_NOT_CONFIGURED",
            AiError::RequestFailed(_) => "AI_REQUEST_FAILED",
            AiError::ApiError { .. } => "AI_API_ERROR",
            AiError::InvalidResponse(_) => "AI_INVALID_RESPONSE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let err = |status| AiError::ApiError {
            status,
            message: String::new(),
        };
        assert!(err(500).is_retryable());
        assert!(err(503).is_retryable());
        assert!(err(429).is_retryable());
        assert!(!err(400).is_retryable());
        assert!(!err(404).is_retryable());
        assert!(!AiError::NotConfigured("resume parser").is_retryable());
        assert!(!AiError::InvalidResponse("eof".into()).is_retryable());
    }
}
