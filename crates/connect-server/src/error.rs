//! HTTP mapping of domain errors.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use connect_auth::AuthError;
use connect_model::ConnectError;

/// Startup failures of the binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Auth setup failed: {0}")]
    Auth(#[from] AuthError),

    #[error("AI client setup failed: {0}")]
    Ai(#[from] connect_ai::AiError),

    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[from] ConnectError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Any handler failure, rendered as `{ success: false, message }`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ConnectError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ConnectError::ValidationFailed(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ConnectError::ValidationFailed(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected path parameter");
        Self(ConnectError::ValidationFailed("Invalid id".to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_server_error() {
            error!(error = %err, code = err.error_code(), "Request failed");
        }
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "success": false,
            "message": err.public_message(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ConnectError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_business_errors_keep_message() {
        let (status, body) = render(ConnectError::Conflict("Already registered".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Already registered");
    }

    #[tokio::test]
    async fn test_unexpected_errors_are_masked() {
        let (status, body) = render(ConnectError::Unexpected("lock poisoned".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_gone_status() {
        let (status, _) = render(ConnectError::Gone("Event cancelled".into())).await;
        assert_eq!(status, StatusCode::GONE);
    }
}
