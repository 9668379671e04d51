//! Callable-function transport adapter.
//!
//! Mirrors `POST /notify` behind the `{"data": ...}` / `{"result": ...}`
//! envelope used by callable-function clients, with canonical status names
//! in place of error codes.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use vitrix_core::error::{AppError, ErrorKind};

use crate::dto::request::{CallableRequest, NotifyRequest};
use crate::dto::response::{
    CallableError, CallableErrorBody, CallableResult, SendNotificationResult,
};
use crate::state::AppState;

/// An error in callable form.
#[derive(Debug)]
pub struct CallableFailure(pub AppError);

impl From<AppError> for CallableFailure {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Canonical status name and HTTP status for an error kind.
pub fn callable_status(kind: ErrorKind) -> (&'static str, StatusCode) {
    match kind {
        ErrorKind::Validation => ("INVALID_ARGUMENT", StatusCode::BAD_REQUEST),
        ErrorKind::NoRecipients | ErrorKind::NotFound => ("NOT_FOUND", StatusCode::NOT_FOUND),
        ErrorKind::GatewayUnconfigured => ("FAILED_PRECONDITION", StatusCode::BAD_REQUEST),
        _ => ("INTERNAL", StatusCode::INTERNAL_SERVER_ERROR),
    }
}

impl IntoResponse for CallableFailure {
    fn into_response(self) -> Response {
        let err = self.0;
        let (name, status) = callable_status(err.kind);

        if status.is_server_error() {
            tracing::error!(kind = %err.kind, error = %err.message, "Callable failed");
        } else {
            tracing::debug!(kind = %err.kind, error = %err.message, "Callable rejected");
        }

        // Internal details stay in the log.
        let message = if status.is_server_error() {
            "Internal error".to_string()
        } else {
            err.message
        };

        let body = CallableError {
            error: CallableErrorBody {
                status: name.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// POST /functions/sendNotification
pub async fn send_notification(
    State(state): State<AppState>,
    body: Result<Json<CallableRequest<NotifyRequest>>, JsonRejection>,
) -> Result<Json<CallableResult<SendNotificationResult>>, CallableFailure> {
    let Json(envelope) = body.map_err(|rejection| {
        AppError::validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let request = envelope.data.into_domain()?;
    let outcome = state.notification_service.notify(&request).await?;

    Ok(Json(CallableResult {
        result: outcome.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_canonical_statuses() {
        assert_eq!(
            callable_status(ErrorKind::Validation),
            ("INVALID_ARGUMENT", StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            callable_status(ErrorKind::NoRecipients),
            ("NOT_FOUND", StatusCode::NOT_FOUND)
        );
        assert_eq!(
            callable_status(ErrorKind::GatewayUnconfigured),
            ("FAILED_PRECONDITION", StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            callable_status(ErrorKind::Database),
            ("INTERNAL", StatusCode::INTERNAL_SERVER_ERROR)
        );
    }
}
