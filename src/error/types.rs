use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::DocumentFormat;
use crate::services::completion::CompletionError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please upload a document.")]
    MissingFile,

    #[error("File too large: uploads are limited to {limit}MB")]
    FileTooLarge { limit: usize },

    #[error("Invalid file: {message}")]
    InvalidFile { message: String },

    #[error("Unsupported document type: {media_type} (upload a Word .docx or PDF file)")]
    UnsupportedFormat { media_type: String },

    #[error("Could not extract text from {format}: {message}")]
    ExtractionFailed { format: DocumentFormat, message: String },

    #[error("Model request failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("Rate limit exceeded: maximum concurrent analyses reached")]
    RateLimitExceeded,

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingFile => "MISSING_FILE",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::InvalidFile { .. } => "INVALID_FILE",
            AppError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            AppError::ExtractionFailed { .. } => "EXTRACTION_FAILED",
            AppError::Completion(err) => match err {
                CompletionError::Timeout => "MODEL_TIMEOUT",
                CompletionError::Unauthorized => "MODEL_AUTH_FAILED",
                CompletionError::QuotaExceeded => "MODEL_QUOTA_EXCEEDED",
                CompletionError::MalformedResponse(_) => "MODEL_MALFORMED_RESPONSE",
                CompletionError::Api { .. } | CompletionError::Transport(_) => "MODEL_UNAVAILABLE",
            },
            AppError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            AppError::ValidationError { .. } => "VALIDATION_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidFile { .. } => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ExtractionFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Completion(err) => match err {
                CompletionError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                CompletionError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
                CompletionError::Unauthorized
                | CompletionError::MalformedResponse(_)
                | CompletionError::Api { .. }
                | CompletionError::Transport(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();
        let request_id = Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().to_rfc3339();

        tracing::error!(
            error_code = error_code,
            status_code = %status,
            request_id = %request_id,
            error_message = %message,
            "API error occurred"
        );

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
                "request_id": request_id,
                "timestamp": timestamp
            },
            "data": null
        }));

        (status, body).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal {
            message: format!("Extraction worker failed: {}", err),
        }
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError {
            message: message.into(),
        }
    }

    pub fn invalid_file(message: impl Into<String>) -> Self {
        AppError::InvalidFile {
            message: message.into(),
        }
    }

    pub fn extraction(format: DocumentFormat, message: impl Into<String>) -> Self {
        AppError::ExtractionFailed {
            format,
            message: message.into(),
        }
    }
}
