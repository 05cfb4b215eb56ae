use std::fmt::{Debug, Display};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use owo_colors::OwoColorize;

use crate::ErrorBody;

pub fn print_error<T: Display + Debug>(e: T) {
    eprintln!(
        "{}",
        format!("error: {:?}", e)
            .split('\n')
            .map(|s| s.red().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    );
}

/// Builds a `{"error": ..., "details": ...}` JSON body at the given status,
/// logging the underlying cause to stderr/tracing first.
pub fn err_resp<T: Display + Debug>(e: T, code: StatusCode) -> Response {
    let body = ErrorBody {
        error: code
            .canonical_reason()
            .unwrap_or("error")
            .to_ascii_lowercase(),
        details: Some(e.to_string()),
    };
    if code.is_server_error() {
        tracing::error!(error = %e, status = %code, "request error");
    } else {
        tracing::debug!(error = %e, status = %code, "request rejected");
    }
    (code, Json(body)).into_response()
}

pub fn not_found<T: Display + Debug>(e: T) -> Response {
    err_resp(e, StatusCode::NOT_FOUND)
}

pub fn conflict<T: Display + Debug>(e: T) -> Response {
    err_resp(e, StatusCode::CONFLICT)
}

pub fn bad_request<T: Display + Debug>(e: T) -> Response {
    err_resp(e, StatusCode::BAD_REQUEST)
}

pub fn forbidden<T: Display + Debug>(e: T) -> Response {
    err_resp(e, StatusCode::FORBIDDEN)
}

pub fn service_unavailable<T: Display + Debug>(e: T) -> Response {
    err_resp(e, StatusCode::SERVICE_UNAVAILABLE)
}

pub fn internal_server_error<T: Display + Debug>(e: T) -> Response {
    err_resp(e, StatusCode::INTERNAL_SERVER_ERROR)
}
