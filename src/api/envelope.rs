//! JSON envelope for `/api/v1`.
//!
//! Success bodies are `{ "data": ..., "meta": ... }`. Failures are an
//! [`ApiError`], rendered as `{ "error": { "code", "message" }, "meta": ... }`
//! with a stable code per failure kind.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::AreaId;

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

impl ResponseMeta {
    fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Response {
        Json(Self {
            data,
            meta: ResponseMeta::now(),
        })
        .into_response()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unknown area '{}'. Use one of: {}", .0, known_areas())]
    UnknownArea(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("No such endpoint: {0}")]
    NotFound(String),
}

fn known_areas() -> String {
    AreaId::ALL.iter().map(|a| a.id()).collect::<Vec<_>>().join(", ")
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownArea(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::UnknownArea(_) => "UNKNOWN_AREA",
            ApiError::InvalidBody(_) => "INVALID_BODY",
            ApiError::NotFound(_) => "NOT_FOUND",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
    meta: ResponseMeta,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(code = self.code(), error = %self, "Request rejected");
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
            meta: ResponseMeta::now(),
        };
        (self.status(), Json(envelope)).into_response()
    }
}
