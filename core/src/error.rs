//! Typed error taxonomy shared by the Store, Authorizer, Lifecycle Service
//! and API layer. Each layer returns its own enum; the API layer is the only
//! place that knows about HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kite_common::ErrorBody;

/// Errors raised by the Store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("relationship already exists")]
    Conflict,
    #[error("database unavailable: {0}")]
    Unavailable(#[from] deadpool_postgres::PoolError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(e: tokio_postgres::Error) -> Self {
        StoreError::Internal(e.into())
    }
}

/// Errors raised by the Authorizer.
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error("access review unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by the Issue Lifecycle Service. This is the error type the
/// API handlers and Event Ingress deal with directly.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("namespace is required")]
    MissingNamespace,
    #[error("not authorized in this namespace")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ServiceError::NotFound,
            StoreError::Conflict => ServiceError::Conflict("relationship already exists".into()),
            StoreError::Unavailable(e) => ServiceError::Unavailable(e.to_string()),
            StoreError::Internal(e) => ServiceError::Internal(e.to_string()),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(e: AuthzError) -> Self {
        match e {
            AuthzError::Unavailable(msg) => ServiceError::Unavailable(msg),
        }
    }
}

/// Top-level error type returned by handlers; implements `IntoResponse`
/// directly, mapping kinds to HTTP status per the error-to-status table.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ApiError(#[from] pub ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self.0 {
            ServiceError::InvalidInput(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServiceError::MissingNamespace => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            ServiceError::Unauthorized => (StatusCode::FORBIDDEN, self.0.to_string()),
            ServiceError::NotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            ServiceError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            ServiceError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),
            ServiceError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
        };

        if code.is_server_error() {
            tracing::error!(error = %self.0, status = %code, "request error");
        } else {
            tracing::debug!(error = %self.0, status = %code, "request rejected");
        }

        let body = ErrorBody {
            error: code.canonical_reason().unwrap_or("error").to_ascii_lowercase(),
            details: Some(msg),
        };
        (code, axum::Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
