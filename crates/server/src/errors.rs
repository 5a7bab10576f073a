use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::storage::MediaError;
use thiserror::Error;
use tracing::{error, warn};

use crate::observability::AUTH_FAILURES_TOTAL;

/// Every handler failure; rendered as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Auth(e) => ApiError::Auth(e),
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Db(msg) => ApiError::Internal(msg),
            ServiceError::Media(e @ (MediaError::ExtensionNotAllowed | MediaError::Decode(_))) => ApiError::BadRequest(e.to_string()),
            ServiceError::Media(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) if e.is_unauthorized() => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match (&self, status) {
            (_, StatusCode::INTERNAL_SERVER_ERROR) => {
                error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            (ApiError::Auth(e), StatusCode::UNAUTHORIZED) => {
                AUTH_FAILURES_TOTAL.inc();
                warn!(code = e.code(), error = %e, "authentication failed");
                e.to_string()
            }
            _ => self.to_string(),
        };
        let mut resp = (status, Json(serde_json::json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            resp.headers_mut().insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
