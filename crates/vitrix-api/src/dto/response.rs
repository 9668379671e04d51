//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitrix_entity::message::{Message, ReadReceipt, ReadSummary};
use vitrix_service::NotificationResult;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Bare acknowledgement: `{"success": true}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always `true` on a 2xx.
    pub success: bool,
}

impl SuccessResponse {
    /// The acknowledgement.
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// A message with its receipts and read counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message id.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Body.
    pub body: String,
    /// Rendered target.
    pub target: String,
    /// When the message was recorded.
    pub created_at: DateTime<Utc>,
    /// Read counts.
    pub summary: ReadSummary,
    /// One receipt per recipient.
    pub read_receipts: Vec<ReadReceipt>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            summary: message.summary(),
            id: message.id,
            title: message.title,
            body: message.body,
            target: message.target,
            created_at: message.created_at,
            read_receipts: message.read_receipts,
        }
    }
}

/// A message in a listing, without its receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSummaryResponse {
    /// Message id.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Rendered target.
    pub target: String,
    /// When the message was recorded.
    pub created_at: DateTime<Utc>,
    /// Read counts.
    pub summary: ReadSummary,
}

impl From<&Message> for MessageSummaryResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            title: message.title.clone(),
            target: message.target.clone(),
            created_at: message.created_at,
            summary: message.summary(),
        }
    }
}

/// Callable-function success envelope: `{"result": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct CallableResult<T: Serialize> {
    /// Function result.
    pub result: T,
}

/// Result of the `sendNotification` callable.
#[derive(Debug, Clone, Serialize)]
pub struct SendNotificationResult {
    /// The delivery report and recorded message id.
    #[serde(flatten)]
    pub outcome: NotificationResult,
    /// Whether at least one recipient was reached.
    pub success: bool,
}

impl From<NotificationResult> for SendNotificationResult {
    fn from(outcome: NotificationResult) -> Self {
        Self {
            success: outcome.report.sent > 0,
            outcome,
        }
    }
}

/// Callable-function error envelope: `{"error": {"status", "message"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallableError {
    /// The error.
    pub error: CallableErrorBody,
}

/// Callable-function error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallableErrorBody {
    /// Canonical status name, e.g. `INVALID_ARGUMENT`.
    pub status: String,
    /// Human-readable message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Whether the push gateway has a credential.
    pub gateway_configured: bool,
    /// Store backend name.
    pub store: String,
}
