//! Send endpoint.

use axum::Json;
use axum::extract::State;

use vitrix_service::NotificationResult;

use crate::dto::request::NotifyRequest;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// POST /notify
///
/// Answers with the delivery report whenever the target resolved, even if
/// every token was rejected.
pub async fn notify(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NotifyRequest>,
) -> Result<Json<NotificationResult>, ApiError> {
    let request = req.into_domain()?;
    let result = state.notification_service.notify(&request).await?;
    Ok(Json(result))
}
