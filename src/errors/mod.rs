//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: &str) -> Json<Self> {
        Json(Self {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        })
    }
}

/// Request-level error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, ApiResponse::<()>::error(code, &message)).into_response()
    }
}

/// Failure of a single upstream collection fetch.
///
/// Cloneable because every caller waiting on the same in-flight fetch
/// receives its own copy of the outcome.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("request to {resource} failed: {message}")]
    Transport { resource: String, message: String },

    #[error("{resource} responded with HTTP {status}")]
    Status { resource: String, status: u16 },

    #[error("{resource} returned an unreadable body: {message}")]
    Decode { resource: String, message: String },
}

impl FetchError {
    /// Build a fetch error from a reqwest failure, keeping the HTTP status when known.
    pub fn from_reqwest(resource: &str, err: &reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            },
            None if err.is_decode() => Self::Decode {
                resource: resource.to_string(),
                message: err.to_string(),
            },
            None => Self::Transport {
                resource: resource.to_string(),
                message: err.to_string(),
            },
        }
    }
}
