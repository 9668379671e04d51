//! Idempotent, monotonic read-receipt reconciliation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use vitrix_core::{AppError, AppResult};
use vitrix_database::{MessageStore, ReceiptWrite};
use vitrix_entity::message::{Message, OpenType, ReadReceipt, ReceiptIdentity};

use super::directory::AccountDirectory;

/// Apply one open to a receipt list.
///
/// Updates the identity's receipt in place, filling in a missing email or
/// user id, or appends a new one named `user_name`. Returns `false` when the
/// list was already in the requested state.
pub fn apply_open(
    receipts: &mut Vec<ReadReceipt>,
    identity: &ReceiptIdentity,
    open_type: OpenType,
    at: DateTime<Utc>,
    user_name: &str,
) -> bool {
    if let Some(receipt) = receipts.iter_mut().find(|r| identity.matches(r)) {
        let mut changed = false;
        if receipt.user_email.is_none() && identity.email.is_some() {
            receipt.user_email = identity.email.clone();
            changed = true;
        }
        if receipt.user_id.is_none() && identity.user_id.is_some() {
            receipt.user_id = identity.user_id.clone();
            changed = true;
        }
        if !(receipt.is_read && receipt.is_opened(open_type)) {
            receipt.mark_opened(open_type, at);
            changed = true;
        }
        return changed;
    }

    let mut receipt = ReadReceipt::unread(
        identity.email.clone(),
        identity.user_id.clone(),
        user_name,
    );
    receipt.mark_opened(open_type, at);
    receipts.push(receipt);
    true
}

/// Records opens against stored messages with optimistic concurrency.
///
/// Each attempt re-reads the message and writes the whole receipt list
/// back only if the version is unchanged, so concurrent opens for
/// different recipients are never lost.
#[derive(Debug, Clone)]
pub struct ReceiptReconciler {
    messages: Arc<dyn MessageStore>,
    directory: AccountDirectory,
    max_attempts: u32,
}

impl ReceiptReconciler {
    /// Create a reconciler retrying version conflicts up to `max_attempts` times.
    pub fn new(
        messages: Arc<dyn MessageStore>,
        directory: AccountDirectory,
        max_attempts: u32,
    ) -> Self {
        Self {
            messages,
            directory,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Record that `identity` opened message `message_id` via `open_type`.
    pub async fn record_open(
        &self,
        message_id: Uuid,
        identity: &ReceiptIdentity,
        open_type: OpenType,
    ) -> AppResult<Message> {
        let now = Utc::now();
        let mut user_name: Option<String> = None;

        for attempt in 1..=self.max_attempts {
            let message = self
                .messages
                .find_by_id(message_id)
                .await?
                .ok_or_else(|| AppError::message_not_found(message_id))?;

            if user_name.is_none() && message.receipt_for(identity).is_none() {
                user_name = Some(self.directory.display_name(identity).await);
            }

            let mut receipts = message.read_receipts.clone();
            let name = user_name.as_deref().unwrap_or(super::directory::UNKNOWN_NAME);
            if !apply_open(&mut receipts, identity, open_type, now, name) {
                debug!(message_id = %message_id, identity = identity.key(), "Open already recorded");
                return Ok(message);
            }

            match self
                .messages
                .replace_receipts(message_id, message.version, &receipts)
                .await?
            {
                ReceiptWrite::Updated(updated) => {
                    debug!(
                        message_id = %message_id,
                        identity = identity.key(),
                        open_type = %open_type,
                        version = updated.version,
                        "Recorded open"
                    );
                    return Ok(updated);
                }
                ReceiptWrite::Conflict => {
                    debug!(
                        message_id = %message_id,
                        attempt,
                        "Receipt write conflicted; retrying"
                    );
                }
                ReceiptWrite::Missing => return Err(AppError::message_not_found(message_id)),
            }
        }

        Err(AppError::conflict(format!(
            "Receipts of message '{message_id}' kept changing; gave up after {} attempts",
            self.max_attempts
        )))
    }
}
