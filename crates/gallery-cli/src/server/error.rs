//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gallery::{GalleryError, StoreError};
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Error from the gallery library.
    Gallery(GalleryError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            ApiError::Gallery(e) => match e {
                GalleryError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                GalleryError::Validation(_) | GalleryError::Transition(_) => {
                    (StatusCode::BAD_REQUEST, "validation")
                }
                GalleryError::Store(StoreError::Conflict { .. }) => {
                    (StatusCode::CONFLICT, "conflict")
                }
                // Store failures are safe to retry.
                GalleryError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
                GalleryError::Persistence(_)
                | GalleryError::Config(_)
                | GalleryError::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
            ApiError::Gallery(e) => e.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<GalleryError> for ApiError {
    fn from(err: GalleryError) -> Self {
        ApiError::Gallery(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Gallery(err.into())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Gallery(e) => write!(f, "Gallery error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
