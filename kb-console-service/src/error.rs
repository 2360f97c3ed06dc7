use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors from the document ingestion dispatcher
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to extract text: {message}")]
    ExtractionFailed { message: String },
}

/// Errors talking to the knowledge-base backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend unavailable at {url}")]
    Unavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response from backend: {message}")]
    InvalidResponse { message: String },
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Extraction(ExtractionError::UnsupportedFormat { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ServiceError::Extraction(ExtractionError::ExtractionFailed { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::Backend(_) => StatusCode::BAD_GATEWAY,
            ServiceError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::SessionNotFound { .. } => "session_not_found",
            ServiceError::Extraction(ExtractionError::UnsupportedFormat { .. }) => {
                "unsupported_format"
            }
            ServiceError::Extraction(ExtractionError::ExtractionFailed { .. }) => {
                "extraction_failed"
            }
            ServiceError::Backend(BackendError::Unavailable { .. }) => "backend_unavailable",
            ServiceError::Backend(BackendError::Rejected { .. }) => "backend_rejected",
            ServiceError::Backend(BackendError::InvalidResponse { .. }) => {
                "backend_invalid_response"
            }
            ServiceError::InvalidRequest { .. } => "invalid_request",
            ServiceError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();

        let response = ErrorResponse {
            message: self.to_string(),
            code: Some(code),
        };

        (status, Json(response)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
