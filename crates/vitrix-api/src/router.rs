//! Route definitions for the Vitrix HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the routed application with request logging.
///
/// Transport layers (CORS, tracing, timeout, compression) are added by
/// [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(notify_routes())
        .merge(message_routes())
        .merge(callable_routes())
        .merge(health_routes())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Send endpoint
fn notify_routes() -> Router<AppState> {
    Router::new().route("/notify", post(handlers::notify::notify))
}

/// Read receipts and message inspection
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::receipts::list_messages))
        .route("/notifications/{id}", get(handlers::receipts::get_message))
        .route("/notifications/{id}/open", post(handlers::receipts::record_open))
        .route(
            "/notifications/{id}/open.gif",
            get(handlers::receipts::open_pixel),
        )
}

/// Callable-function transport adapter
fn callable_routes() -> Router<AppState> {
    Router::new().route(
        "/functions/sendNotification",
        post(handlers::callable::send_notification),
    )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
