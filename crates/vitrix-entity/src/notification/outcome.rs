//! Per-token dispatch outcome.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Settled state of one token's send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    /// The gateway accepted the message.
    Fulfilled,
    /// The gateway or the network rejected the message.
    Rejected,
}

/// Result of sending to one (recipient, device token) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// The recipient the token belongs to.
    pub recipient_id: Uuid,
    /// The device token.
    pub token: String,
    /// Whether the send succeeded.
    pub status: OutcomeStatus,
    /// Gateway error code, kept for diagnostics.
    pub error_code: Option<String>,
    /// Gateway error message, kept for diagnostics.
    pub error_message: Option<String>,
}

impl DispatchOutcome {
    /// A successful send.
    pub fn fulfilled(recipient_id: Uuid, token: impl Into<String>) -> Self {
        Self {
            recipient_id,
            token: token.into(),
            status: OutcomeStatus::Fulfilled,
            error_code: None,
            error_message: None,
        }
    }

    /// A failed send.
    pub fn rejected(
        recipient_id: Uuid,
        token: impl Into<String>,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            recipient_id,
            token: token.into(),
            status: OutcomeStatus::Rejected,
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
        }
    }

    /// Whether the send succeeded.
    pub fn is_fulfilled(&self) -> bool {
        self.status == OutcomeStatus::Fulfilled
    }
}
