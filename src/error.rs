//! Error types for Biblio server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::images::ImageError;

/// Stable error codes returned to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    NoSuchData = 5,
    BadValue = 18,
    StillReferenced = 21,
    EmptyImage = 30,
    UnsupportedImage = 31,
    ResizeNotSupported = 32,
    ImageTooLarge = 33,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        // Foreign key violation: the row is still referenced (or references a missing row)
        if let sqlx::Error::Database(ref db) = e {
            if db.code().as_deref() == Some("23503") {
                return AppError::Conflict(db.message().to_string());
            }
        }
        AppError::Database(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue)
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::StillReferenced),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
            AppError::Image(e) => match e {
                ImageError::EmptyInput => (StatusCode::BAD_REQUEST, ErrorCode::EmptyImage),
                ImageError::InvalidWidth { .. } => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
                ImageError::TooLarge { .. } => (StatusCode::BAD_REQUEST, ErrorCode::ImageTooLarge),
                ImageError::UnknownFormat | ImageError::Decode(_) => {
                    (StatusCode::BAD_REQUEST, ErrorCode::UnsupportedImage)
                }
                ImageError::Encode { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::UnsupportedImage)
                }
                ImageError::UnsupportedPlatform => {
                    (StatusCode::NOT_IMPLEMENTED, ErrorCode::ResizeNotSupported)
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Image(e) => {
                tracing::warn!("Image rejected: {}", e);
                e.to_string()
            }
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => msg.clone(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_errors_map_to_status() {
        let cases = [
            (ImageError::EmptyInput, StatusCode::BAD_REQUEST),
            (ImageError::InvalidWidth { width: 0, max: 10 }, StatusCode::BAD_REQUEST),
            (ImageError::UnknownFormat, StatusCode::BAD_REQUEST),
            (
                ImageError::TooLarge { width: 4096, height: 8_192_000, max_pixels: 16_777_216 },
                StatusCode::BAD_REQUEST,
            ),
            (ImageError::UnsupportedPlatform, StatusCode::NOT_IMPLEMENTED),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_domain_errors_map_to_status() {
        assert_eq!(
            AppError::NotFound("Book".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("loan".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(sqlx::Error::RowNotFound).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = AppError::Image(ImageError::EmptyInput).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["code"], 30);
        assert_eq!(body["error"], "EmptyImage");
        assert_eq!(body["message"], "Image stream is empty");
    }
}
