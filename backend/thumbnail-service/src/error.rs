/// Error types for Thumbnail Service
///
/// Cache failures are mapped onto HTTP statuses by their kind so that callers
/// can tell a bad request from an unavailable dependency.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use std::fmt;
use thumbnail_cache::{ErrorKind, ThumbnailCacheError};

/// Result type for thumbnail-service handlers
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Request parameters missing or malformed
    ValidationError(String),

    /// Thumbnail cache lookup failed
    Cache(ThumbnailCacheError),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status: u16,
    pub code: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Cache(err) => write!(f, "{}", err),
        }
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Cache(err) => match err.kind() {
                ErrorKind::DependencyFailure => "DEPENDENCY_UNAVAILABLE",
                ErrorKind::ExternalApiFailure => "THUMBNAIL_API_ERROR",
                ErrorKind::BadResponse => "THUMBNAIL_API_BAD_RESPONSE",
                ErrorKind::Configuration => "INTERNAL_SERVER_ERROR",
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Cache(err) => match err.kind() {
                ErrorKind::DependencyFailure => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::ExternalApiFailure | ErrorKind::BadResponse => StatusCode::BAD_GATEWAY,
                ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let response = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: self.to_string(),
            status: status.as_u16(),
            code: self.code().to_string(),
        };

        HttpResponse::build(status).json(response)
    }
}

impl From<ThumbnailCacheError> for AppError {
    fn from(err: ThumbnailCacheError) -> Self {
        AppError::Cache(err)
    }
}
