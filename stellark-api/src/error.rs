//! Error types for stellark-api
//!
//! Validation failures become 400 responses before the engine runs; store and
//! collaborator failures become 500 responses. The body is always an
//! [`ErrorResponse`].

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stellark_common::api::ErrorResponse;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (500) with a client-facing summary and the cause
    #[error("{message}: {cause}")]
    Internal { message: String, cause: String },

    /// stellark-common error
    #[error("Common error: {0}")]
    Common(#[from] stellark_common::Error),
}

impl ApiError {
    /// 500 with `message` shown to the client and `cause` in `details`
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: message.into(),
            cause: cause.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            ApiError::Internal { message, cause } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details(message, json!(cause)),
            ),
            ApiError::Common(stellark_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(msg))
            }
            ApiError::Common(err) => {
                tracing::error!("Unhandled common error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details("Internal server error", json!(err.to_string())),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
