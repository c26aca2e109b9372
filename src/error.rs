//! Error types for the Polizas server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::batch::BatchError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    #[error("Empty batch: no files uploaded")]
    EmptyBatch,

    #[error("Too many files: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Archive not ready")]
    ArchiveNotReady,

    #[error("Archive already retrieved")]
    ArchiveGone,

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BatchNotFound(_) => StatusCode::NOT_FOUND,
            Self::EmptyBatch => StatusCode::BAD_REQUEST,
            Self::TooManyFiles { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::ArchiveNotReady => StatusCode::CONFLICT,
            Self::ArchiveGone => StatusCode::GONE,
            Self::Upload(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BatchNotFound(_) => "BATCH_NOT_FOUND",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::TooManyFiles { .. } => "TOO_MANY_FILES",
            Self::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            Self::ArchiveNotReady => "ARCHIVE_NOT_READY",
            Self::ArchiveGone => "ARCHIVE_GONE",
            Self::Upload(_) => "UPLOAD_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::NotFound(id) => AppError::BatchNotFound(id),
            BatchError::ArchiveNotReady => AppError::ArchiveNotReady,
            BatchError::ArchiveTaken => AppError::ArchiveGone,
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(msg) = &self {
            tracing::error!("Internal error: {}", msg);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (self.status_code(), body).into_response()
    }
}
