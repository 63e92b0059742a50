use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

/// Handler failure. The detail is logged, never sent to the client; the body
/// only carries the status reason phrase.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => ApiError::NotFound(e.to_string()),
            ServiceError::Model(_) => ApiError::BadRequest(e.to_string()),
            // AlreadyExists cannot reach a handler through upsert; treat it as internal like the rest
            ServiceError::AlreadyExists(_) | ServiceError::Persistence(_) | ServiceError::Load(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(detail) => error!(status = status.as_u16(), error = %detail, "request failed"),
            ApiError::BadRequest(detail) | ApiError::NotFound(detail) => {
                debug!(status = status.as_u16(), reason = %detail, "request rejected")
            }
        }
        let reason = status.canonical_reason().unwrap_or("error");
        (status, Json(serde_json::json!({ "error": reason }))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("store unavailable: {0}")]
    Store(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
