//! API Middleware
//!
//! Per-request access log keyed by route template and request id.

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Header carrying the per-request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let masked_value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Route template such as `/users/detail/:id/`, or the raw path when no
/// route matched.
fn route_of(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Access log: client errors at warn, server errors at error.
/// Headers are only logged at debug level.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let route = route_of(&request);
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    tracing::debug!(
        %method,
        %route,
        %request_id,
        query = request.uri().query().unwrap_or(""),
        headers = ?mask_headers_for_logging(request.headers()),
        "Request received"
    );

    let start = Instant::now();
    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match status_class(status) {
        StatusClass::ServerError => {
            tracing::error!(%method, %route, %request_id, %status, elapsed_ms, "Request failed")
        }
        StatusClass::ClientError => {
            tracing::warn!(%method, %route, %request_id, %status, elapsed_ms, "Request rejected")
        }
        StatusClass::Success => {
            tracing::info!(%method, %route, %request_id, %status, elapsed_ms, "Request completed")
        }
    }

    response
}

#[derive(Debug, PartialEq, Eq)]
enum StatusClass {
    Success,
    ClientError,
    ServerError,
}

fn status_class(status: StatusCode) -> StatusClass {
    if status.is_server_error() {
        StatusClass::ServerError
    } else if status.is_client_error() {
        StatusClass::ClientError
    } else {
        StatusClass::Success
    }
}
