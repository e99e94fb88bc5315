//! Thumbnail cache error types

use thiserror::Error;

/// Result type for thumbnail cache operations
pub type Result<T> = std::result::Result<T, ThumbnailCacheError>;

#[derive(Error, Debug)]
pub enum ThumbnailCacheError {
    /// Metadata store (DynamoDB) read or write failed
    #[error("Metadata store error: {0}")]
    MetadataStore(String),

    /// Object store (S3) metadata lookup failed
    #[error("Object store error: {0}")]
    ObjectStore(String),

    /// Thumbnail API could not be reached
    #[error("Thumbnail API request failed: {0}")]
    ThumbnailApi(String),

    /// Thumbnail API answered with a non-success status
    #[error("Thumbnail API request error: {status}")]
    ExternalApi { status: u16 },

    /// Thumbnail API body was not valid JSON or lacked a required field
    #[error("Invalid thumbnail API response: {0}")]
    BadResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification used for metrics labels and HTTP status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DependencyFailure,
    ExternalApiFailure,
    BadResponse,
    Configuration,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DependencyFailure => "dependency_failure",
            ErrorKind::ExternalApiFailure => "external_api_failure",
            ErrorKind::BadResponse => "bad_response",
            ErrorKind::Configuration => "configuration",
        }
    }
}

impl ThumbnailCacheError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThumbnailCacheError::MetadataStore(_)
            | ThumbnailCacheError::ObjectStore(_)
            | ThumbnailCacheError::ThumbnailApi(_) => ErrorKind::DependencyFailure,
            ThumbnailCacheError::ExternalApi { .. } => ErrorKind::ExternalApiFailure,
            ThumbnailCacheError::BadResponse(_) => ErrorKind::BadResponse,
            ThumbnailCacheError::Config(_) => ErrorKind::Configuration,
        }
    }
}

impl From<serde_json::Error> for ThumbnailCacheError {
    fn from(err: serde_json::Error) -> Self {
        ThumbnailCacheError::BadResponse(err.to_string())
    }
}
