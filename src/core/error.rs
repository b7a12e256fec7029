use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Validation failure carrying one message per failing field
    #[error("Validation error: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Persistence failure; the message is fixed per operation and safe to show
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

/// Errors raised by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A foreign key pointed at a row that does not exist
    #[error("Missing reference: {0}")]
    MissingReference(&'static str),
}

impl RepositoryError {
    /// Classify a sqlx error, turning foreign key violations into `MissingReference`
    pub fn from_sqlx(err: sqlx::Error, reference: &'static str) -> Self {
        let is_fk_violation = err
            .as_database_error()
            .map(|db| db.is_foreign_key_violation())
            .unwrap_or(false);

        if is_fk_violation {
            RepositoryError::MissingReference(reference)
        } else {
            RepositoryError::Database(err)
        }
    }
}

pub type RepoResult<T> = std::result::Result<T, RepositoryError>;

impl AppError {
    /// Build a mapper that logs the underlying repository failure and replaces it
    /// with the fixed message of the operation.
    pub fn persistence(operation: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
        move |err| match err {
            RepositoryError::MissingReference(what) => {
                tracing::warn!("{}: missing {}", operation, what);
                AppError::NotFound(format!("{} not found", what))
            }
            RepositoryError::Database(e) => {
                tracing::error!("{}: {:?}", operation, e);
                AppError::Persistence(operation.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::InvalidFields(ref messages) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(messages.clone()),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Persistence(ref msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None)
            }
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reference_becomes_not_found() {
        let err = AppError::persistence("Failed to submit report")(
            RepositoryError::MissingReference("Category"),
        );
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Category not found"));
    }

    #[test]
    fn test_database_failure_hides_detail() {
        let err = AppError::persistence("Failed to submit report")(RepositoryError::Database(
            sqlx::Error::PoolTimedOut,
        ));
        match err {
            AppError::Persistence(msg) => assert_eq!(msg, "Failed to submit report"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidFields(vec!["x".into()]), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Persistence("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
