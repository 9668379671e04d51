//! Message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::receipt::{ReadReceipt, ReceiptIdentity};
use crate::notification::Target;

/// A recorded broadcast and the read state of each recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// Notification title at send time.
    pub title: String,
    /// Notification body at send time.
    pub body: String,
    /// Rendered target, e.g. `group:Morning Squad` or `all`.
    pub target: String,
    /// One receipt per recipient, at most one per identity.
    pub read_receipts: Vec<ReadReceipt>,
    /// Optimistic concurrency version, bumped on every receipt write.
    pub version: i64,
    /// When the message was recorded.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message at version 0.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        target: &Target,
        read_receipts: Vec<ReadReceipt>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            target: target.to_string(),
            read_receipts,
            version: 0,
            created_at: Utc::now(),
        }
    }

    /// Find the receipt belonging to an identity.
    pub fn receipt_for(&self, identity: &ReceiptIdentity) -> Option<&ReadReceipt> {
        self.read_receipts.iter().find(|r| identity.matches(r))
    }

    /// Count receipts by state.
    pub fn summary(&self) -> ReadSummary {
        let receipts = &self.read_receipts;
        ReadSummary {
            total: receipts.len(),
            read: receipts.iter().filter(|r| r.is_read).count(),
            notification_opened: receipts.iter().filter(|r| r.notification_opened).count(),
            email_opened: receipts.iter().filter(|r| r.email_opened).count(),
        }
    }
}

/// Aggregate read counts for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReadSummary {
    /// Number of receipts.
    pub total: usize,
    /// Receipts opened through any channel.
    pub read: usize,
    /// Receipts opened through the push notification.
    pub notification_opened: usize,
    /// Receipts opened through email.
    pub email_opened: usize,
}
