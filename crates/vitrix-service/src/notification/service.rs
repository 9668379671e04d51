//! Notification orchestration.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use vitrix_core::config::NotificationsConfig;
use vitrix_core::{AppError, AppResult};
use vitrix_database::MessageStore;
use vitrix_entity::message::{Message, OpenType, ReadReceipt, ReceiptIdentity};
use vitrix_entity::notification::{DeliveryReport, NotificationRequest, Recipient};

use super::aggregator::aggregate;
use super::directory::UNKNOWN_NAME;
use super::dispatcher::NotificationDispatcher;
use super::receipts::ReceiptReconciler;
use super::resolver::RecipientResolver;

/// Data key carrying the recorded message id to the client.
pub const MESSAGE_ID_KEY: &str = "message_id";

/// Upper bound for [`NotificationService::recent_messages`].
pub const MAX_RECENT_MESSAGES: u32 = 100;

/// What a dispatch produced.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationResult {
    /// Per-recipient delivery summary.
    #[serde(flatten)]
    pub report: DeliveryReport,
    /// The recorded broadcast, when one was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Uuid>,
}

/// Entry point for sending notifications and recording opens.
#[derive(Debug, Clone)]
pub struct NotificationService {
    resolver: RecipientResolver,
    dispatcher: NotificationDispatcher,
    reconciler: ReceiptReconciler,
    messages: Arc<dyn MessageStore>,
    config: NotificationsConfig,
}

impl NotificationService {
    /// Create the service.
    pub fn new(
        resolver: RecipientResolver,
        dispatcher: NotificationDispatcher,
        reconciler: ReceiptReconciler,
        messages: Arc<dyn MessageStore>,
        config: NotificationsConfig,
    ) -> Self {
        Self {
            resolver,
            dispatcher,
            reconciler,
            messages,
            config,
        }
    }

    /// Whether the push gateway has a credential.
    pub fn gateway_configured(&self) -> bool {
        self.dispatcher.is_configured()
    }

    /// Validate, resolve, optionally record, dispatch and aggregate.
    ///
    /// Input and lookup failures abort before any push is sent. Per-token
    /// failures never fail the call; they show up in the report.
    pub async fn notify(&self, request: &NotificationRequest) -> AppResult<NotificationResult> {
        request.validate()?;
        self.dispatcher.ensure_ready()?;

        let recipients = self.resolver.resolve(&request.target).await?;

        let mut extra = BTreeMap::new();
        let message_id = if self.config.record_broadcasts && request.target.is_broadcast() {
            let message = self.record_broadcast(request, &recipients).await?;
            extra.insert(MESSAGE_ID_KEY.to_string(), message.id.to_string());
            Some(message.id)
        } else {
            None
        };

        let outcomes = self.dispatcher.dispatch(&recipients, request, &extra).await;
        let report = aggregate(&outcomes, recipients.len());

        info!(
            target = %request.target,
            message_id = ?message_id,
            requested = report.requested,
            sent = report.sent,
            failed = report.failed,
            overall = report.overall.as_str(),
            tokens = outcomes.len(),
            "Notification dispatched"
        );

        Ok(NotificationResult { report, message_id })
    }

    async fn record_broadcast(
        &self,
        request: &NotificationRequest,
        recipients: &[Recipient],
    ) -> AppResult<Message> {
        let receipts = recipients
            .iter()
            .map(|r| {
                ReadReceipt::unread(
                    Some(r.email.clone()),
                    Some(r.user_id.to_string()),
                    r.name.clone().unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                )
            })
            .collect();
        let message = Message::new(&request.title, &request.body, &request.target, receipts);
        self.messages.create(&message).await
    }

    /// Record an open; see [`ReceiptReconciler::record_open`].
    pub async fn record_open(
        &self,
        message_id: Uuid,
        identity: &ReceiptIdentity,
        open_type: OpenType,
    ) -> AppResult<Message> {
        self.reconciler
            .record_open(message_id, identity, open_type)
            .await
    }

    /// Load a message or fail with `NotFound`.
    pub async fn get_message(&self, message_id: Uuid) -> AppResult<Message> {
        self.messages
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| AppError::message_not_found(message_id))
    }

    /// Most recent messages, capped at [`MAX_RECENT_MESSAGES`].
    pub async fn recent_messages(&self, limit: u32) -> AppResult<Vec<Message>> {
        self.messages
            .find_recent(limit.clamp(1, MAX_RECENT_MESSAGES))
            .await
    }

    /// Wait for outstanding token deactivations; used on shutdown and in tests.
    pub async fn drain_background(&self) {
        self.dispatcher.wait_background().await;
    }
}
