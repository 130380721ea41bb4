//! API module
//!
//! HTTP API endpoints and middleware.

pub mod docs;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod transactions;
pub mod users;

use axum::{http::HeaderName, routing::get, Router};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use routes::create_router;

/// Build the application with middleware and state applied
pub fn build_app(pool: SqlitePool) -> Router {
    let request_id = HeaderName::from_static(middleware::REQUEST_ID_HEADER);

    // Layers run bottom-up: request id is set before tracing and logging see the request
    Router::new()
        .route("/health", get(health_check))
        .merge(create_router())
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
