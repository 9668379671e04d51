//! Read-receipt and message inspection handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use uuid::Uuid;

use vitrix_core::AppError;
use vitrix_entity::message::{OpenType, ReceiptIdentity};

use crate::dto::request::{ListQuery, OpenRequest, PixelQuery};
use crate::dto::response::{
    ApiResponse, MessageResponse, MessageSummaryResponse, SuccessResponse,
};
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// 1x1 transparent GIF.
pub static TRANSPARENT_GIF: [u8; 43] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

/// Message ids that are not UUIDs cannot exist.
fn parse_message_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::message_not_found(raw))
}

/// POST /notifications/{id}/open
pub async fn record_open(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<OpenRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let (identity, open_type) = req.into_parts()?;
    let message_id = parse_message_id(&id)?;
    state
        .notification_service
        .record_open(message_id, &identity, open_type)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /notifications/{id}/open.gif
///
/// Always answers with the pixel; failures are only logged.
pub async fn open_pixel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PixelQuery>,
) -> impl IntoResponse {
    let outcome = async {
        let identity = ReceiptIdentity::new(query.email, query.user_id)?;
        let message_id = parse_message_id(&id)?;
        state
            .notification_service
            .record_open(message_id, &identity, OpenType::Email)
            .await
    }
    .await;

    if let Err(e) = outcome {
        tracing::warn!(message_id = %id, kind = %e.kind, error = %e.message, "Email open not recorded");
    }

    (
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
        ],
        &TRANSPARENT_GIF[..],
    )
}

/// GET /notifications/{id}
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let message_id = parse_message_id(&id)?;
    let message = state.notification_service.get_message(message_id).await?;
    Ok(Json(ApiResponse::ok(message.into())))
}

/// GET /notifications
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<MessageSummaryResponse>>>, ApiError> {
    let messages = state
        .notification_service
        .recent_messages(query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(
        messages.iter().map(MessageSummaryResponse::from).collect(),
    )))
}
