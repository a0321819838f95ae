// ABOUTME: API error type and its HTTP mapping
// ABOUTME: Converts storage, validation, and export failures into JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use scansheet_core::ValidationError;
use scansheet_export::ExportError;
use scansheet_storage::StorageError;

/// Error type returned by every handler
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl AppError {
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Storage(storage_error) => match storage_error {
                StorageError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                StorageError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                StorageError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
                StorageError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            },
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Message safe to show a client; server-side failures stay generic
    fn to_user_message(&self) -> String {
        match self {
            AppError::Storage(
                e @ (StorageError::NotFound(_)
                | StorageError::Validation(_)
                | StorageError::InvalidInput(_)
                | StorageError::Conflict(_)),
            ) => e.to_string(),
            AppError::Storage(_) => "Database error".to_string(),
            AppError::Validation(e) => e.to_string(),
            AppError::Export(_) => "Failed to generate document".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.to_status_and_code();

        if status.is_server_error() {
            error!(error_code = %code, error = %self, "Request failed");
        } else {
            info!(error_code = %code, error = %self, "API error response");
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code,
                message: self.to_user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::from(StorageError::NotFound("Entry ent-1".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(StorageError::Conflict("dup".into())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(StorageError::InvalidInput("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(ValidationError::InvalidDate("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(StorageError::Database("disk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err = AppError::from(StorageError::Database("secret path".into()));
        assert_eq!(err.to_user_message(), "Database error");

        let err = AppError::from(StorageError::NotFound("Scan scan-1".into()));
        assert_eq!(err.to_user_message(), "Scan scan-1 not found");
    }
}
