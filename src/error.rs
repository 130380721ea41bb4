//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::error::INVALID_CHOICE;
use crate::domain::{DomainError, FieldErrors};
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// The `user` filter names a user that does not exist
    pub fn unknown_user_choice() -> Self {
        AppError::Domain(DomainError::field("user", INVALID_CHOICE))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::Database(e),
            StoreError::DuplicateEmail => AppError::Domain(DomainError::field(
                "email",
                "user entity with this email already exists.",
            )),
            StoreError::UnknownUser(id) => AppError::Domain(DomainError::field(
                "user",
                format!("Invalid pk \"{}\" - object does not exist.", id),
            )),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        // Non-numeric ids never match a resource
        AppError::NotFound(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Messages per payload field, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details, fields) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()), None)
            }

            // 404 Not Found
            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, "not_found", Some(what.clone()), None)
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => match domain_err {
                DomainError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    None,
                    Some(errors.clone()),
                ),
                DomainError::InvalidDateParameter(_) => (
                    StatusCode::BAD_REQUEST,
                    "invalid_date",
                    Some(domain_err.to_string()),
                    None,
                ),
                DomainError::InvalidDateRange => (
                    StatusCode::BAD_REQUEST,
                    "invalid_date_range",
                    Some(domain_err.to_string()),
                    None,
                ),
            },

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None, None)
            }
        };

        let error = match &self {
            // Never leak driver messages to clients
            AppError::Database(_) => "Database error".to_string(),
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}
