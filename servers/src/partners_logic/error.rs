use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// # API Error
///
/// Every failure a handler can report. Rendered as
/// `{timestamp, status, message, details}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad query parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub message: String,
    pub details: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "Invalid input",
            ApiError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            ApiError::InvalidInput(details) => {
                warn!("Invalid argument: {}", details);
                details.clone()
            }
            ApiError::Internal(details) => {
                error!("Unexpected internal error: {}", details);
                details.clone()
            }
        };
        let body = ErrorBody {
            timestamp: Utc::now(),
            status: status.as_u16(),
            message: self.message().to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}
