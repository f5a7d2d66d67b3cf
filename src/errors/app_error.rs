use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::core::analyzer::AnalyzerError;

/// HTTP-facing error for the gateway's request handlers.
///
/// Every variant renders as `{"error": "...", "details"?: "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    /// A multipart body axum could not accept (malformed, too large)
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{message}")]
    Analyzer {
        status: StatusCode,
        message: String,
        details: Option<String>,
    },

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } | AppError::Analyzer { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn analyzer(status: StatusCode, message: &str, details: Option<String>) -> Self {
        AppError::Analyzer {
            status,
            message: message.to_string(),
            details: details.filter(|d| !d.is_empty()),
        }
    }
}

impl From<AnalyzerError> for AppError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::InvalidSubmission(message) => AppError::BadRequest(message),
            AnalyzerError::TempFile(details) => AppError::analyzer(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store audio file",
                Some(details),
            ),
            AnalyzerError::SpawnFailed(_) => AppError::analyzer(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to start tajwid analysis",
                None,
            ),
            AnalyzerError::ProcessFailed { details, .. } => AppError::analyzer(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Tajwid analysis failed",
                Some(details),
            ),
            AnalyzerError::InvalidOutput { details } => AppError::analyzer(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Analyzer returned invalid output",
                Some(details),
            ),
            AnalyzerError::Timeout(seconds) => AppError::analyzer(
                StatusCode::GATEWAY_TIMEOUT,
                "Tajwid analysis timed out",
                Some(format!("No result after {seconds} seconds")),
            ),
            AnalyzerError::Remote { status, message } => AppError::Analyzer {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
                details: None,
            },
            AnalyzerError::Network(_) => AppError::analyzer(
                StatusCode::BAD_GATEWAY,
                "Analyzer service is unreachable",
                None,
            ),
            AnalyzerError::Configuration(message) => AppError::Internal(message),
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = match self {
            AppError::Analyzer {
                message,
                details: Some(details),
                ..
            } => json!({ "error": message, "details": details }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
