//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
///
/// Every variant maps to a status code and a JSON `{"error": ...}` body.
/// Authentication failures are terminal for the request; internal failures
/// are logged with full detail and surfaced as a generic message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Login failed; identical for unknown email and wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on a protected route
    #[error("Missing authentication token")]
    MissingToken,

    /// Token failed verification (malformed, expired, or bad signature)
    #[error("Invalid token")]
    InvalidToken,

    /// Authenticated, but the role does not allow the operation
    #[error("Access denied")]
    Forbidden,

    /// Resource not found
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request failed input validation
    #[error("{0}")]
    Validation(String),

    /// Internal server error
    #[error("Internal server error")]
    Internal,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Missing authentication token".to_string(),
            ),
            ApiError::InvalidToken => (StatusCode::FORBIDDEN, "Invalid token".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Access denied".to_string()),
            ApiError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, format!("{} not found", resource))
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(e) => {
                tracing::error!("Database failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: ApiError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(status_of(ApiError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ApiError::MissingToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ApiError::InvalidToken), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ApiError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ApiError::NotFound("User")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ApiError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_message_is_surfaced() {
        let err = ApiError::Validation("Password must be at least 6 characters long".to_string());
        assert_eq!(
            err.to_string(),
            "Password must be at least 6 characters long"
        );
    }
}
