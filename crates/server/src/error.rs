//! Unified error handling for the REST boundary.
//!
//! Provides a unified `AppError` type mapping domain outcomes to HTTP status
//! codes. All route handlers return `Result<T, AppError>`.
//!
//! # Taxonomy
//!
//! - `NotFound` → 404: a referenced cart/product/recipe/ingredient does not exist
//! - `Conflict` (via `RepositoryError::Conflict`) → 409: a version-fenced write
//!   lost against a concurrent mutation; callers re-read and retry
//! - `BadRequest` → 400: a creation/update request is missing a required field,
//!   rejected at the boundary before reaching the engine
//! - anything else from the storage layer → 500

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed or was rejected.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// JSON body returned for all error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request error");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Repository(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Repository(_) => "Internal server error".to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let resp = AppError::NotFound("cart 1 not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::BadRequest("name is required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp =
            AppError::Repository(RepositoryError::Conflict("stale cart version".into()))
                .into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = AppError::Repository(RepositoryError::Database(sqlx::Error::PoolClosed))
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
