/// Error handling for the API server
///
/// Every handler returns `ApiResult<T>`; whatever goes wrong inside a
/// request ends up here and becomes exactly one JSON response of the form
/// `{"error": "<message>"}`.
///
/// | Variant         | Status |
/// |-----------------|--------|
/// | `BadRequest`    | 400    |
/// | `NotFound`      | 404    |
/// | `Conflict`      | 409    |
/// | `InternalError` | 500    |
///
/// Internal errors are logged with their details; clients only ever see
/// `internal_error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use todo_shared::{auth::password::PasswordError, db::StorageError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned for every missing row
pub const NOT_FOUND_MESSAGE: &str = "Not found";

/// Message returned for duplicate usernames or emails
pub const DUPLICATE_USER_MESSAGE: &str = "username or email already exists";

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No matching row (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage or other server-side failure (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    /// Not-found error with the standard message
    pub fn not_found() -> Self {
        ApiError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => msg,
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                "internal_error".to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Unique violations are conflicts; everything else from storage is a 500
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if err.is_unique_violation() {
            ApiError::Conflict(DUPLICATE_USER_MESSAGE.to_string())
        } else {
            ApiError::InternalError(err.to_string())
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::InternalError(format!("Background task failed: {}", err))
    }
}
