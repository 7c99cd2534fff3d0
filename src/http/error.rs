//! API error type and its JSON rendering.

use axum::extract::rejection::JsonRejection;
use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::relay::RelayError;
use crate::store::StoreError;

/// Every handled failure, rendered as `{ "ok": false, "error": "<message>" }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request fields → 400.
    #[error("{0}")]
    InvalidInput(String),

    /// Referenced config absent → 404.
    #[error("{0}")]
    NotFound(String),

    /// Relay target unreachable or misbehaving → 502.
    #[error("{0}")]
    Upstream(String),

    /// Anything else (storage I/O, corrupt document) → 500.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(json!({ "ok": false, "error": self.to_string() }))).into_response()
    }
}

/// Fallback for unmatched `/api` paths.
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidInput(m) => Self::InvalidInput(m),
            e @ StoreError::NotFound(_) => Self::NotFound(e.to_string()),
            e @ (StoreError::Io(_) | StoreError::Serde(_)) => Self::Internal(e.to_string()),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::InvalidInput(m) => Self::InvalidInput(m),
            RelayError::Upstream(m) => Self::Upstream(m),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}
