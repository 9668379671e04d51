//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Reports `degraded` when the database pool does not answer.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let healthy = match &state.stores.pool {
        Some(pool) => pool.health_check().await.unwrap_or(false),
        None => true,
    };

    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        gateway_configured: state.notification_service.gateway_configured(),
        store: state.stores.provider().as_str().to_string(),
    })
}
