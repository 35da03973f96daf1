//! API error type with automatic HTTP status mapping.
//!
//! Every failure leaving a handler is translated here into the
//! `{"error": message}` envelope and a status code. Internal failures
//! are logged and returned with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: i64 },

    /// Storage-level constraint violation (409)
    Conflict { constraint: String },

    /// Admission control denied the request (429)
    RateLimited,

    /// Counter store unreachable; fail closed (500)
    StoreUnavailable,

    /// Database error (500, logged)
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                format!("{} {} not found", resource, id),
            ),
            Self::Conflict { constraint } => (
                StatusCode::CONFLICT,
                format!("constraint violation: {}", constraint),
            ),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate limit exceeded".to_owned(),
            ),
            Self::StoreUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_owned(),
            ),
            Self::Database(e) => {
                // Log the actual error, return a generic message
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::InvalidReference { entity } => {
                Self::Validation(ValidationError::InvalidReference { entity })
            }
            DbError::Constraint { constraint } => Self::Conflict { constraint },
            e @ DbError::Sqlx(_) => Self::Database(e),
        }
    }
}
