//! # vitrix-api
//!
//! HTTP API layer for Vitrix built on Axum: the notify and open
//! endpoints, message inspection, the email open pixel, the callable
//! adapter, health, CORS and request logging.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
