//! Concurrent, fault-isolated push fan-out.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use vitrix_core::{AppError, AppResult};
use vitrix_database::AccountStore;
use vitrix_entity::notification::{DispatchOutcome, NotificationRequest, Recipient};
use vitrix_push::{PushGateway, PushMessage};

/// Sends one push per (recipient, token) pair and settles every send.
///
/// Tokens the gateway reports as invalid are deactivated on a background
/// task; the dispatch never waits for, or fails because of, that write.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    gateway: Arc<dyn PushGateway>,
    accounts: Arc<dyn AccountStore>,
    background: TaskTracker,
}

impl NotificationDispatcher {
    /// Create a dispatcher.
    pub fn new(gateway: Arc<dyn PushGateway>, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            gateway,
            accounts,
            background: TaskTracker::new(),
        }
    }

    /// Whether the gateway has a credential.
    pub fn is_configured(&self) -> bool {
        self.gateway.is_configured()
    }

    /// Fail with `GatewayUnconfigured` when no send could possibly succeed.
    pub fn ensure_ready(&self) -> AppResult<()> {
        if self.gateway.is_configured() {
            Ok(())
        } else {
            Err(AppError::gateway_unconfigured(
                "Push gateway credential is not configured",
            ))
        }
    }

    /// Send `request` to every token of every recipient.
    ///
    /// Returns exactly one outcome per token, in recipient then token order.
    /// `extra` is merged into each payload's data block.
    pub async fn dispatch(
        &self,
        recipients: &[Recipient],
        request: &NotificationRequest,
        extra: &BTreeMap<String, String>,
    ) -> Vec<DispatchOutcome> {
        let sends = recipients.iter().flat_map(|recipient| {
            recipient.tokens.iter().map(move |token| {
                let message = PushMessage::build(token, request, extra);
                self.send_one(recipient, message)
            })
        });

        join_all(sends).await
    }

    async fn send_one(&self, recipient: &Recipient, message: PushMessage) -> DispatchOutcome {
        let token = message.token().to_string();
        match self.gateway.send(&message).await {
            Ok(_) => DispatchOutcome::fulfilled(recipient.user_id, token),
            Err(err) => {
                warn!(
                    recipient = %recipient.user_id,
                    error_code = err.code(),
                    error = %err,
                    "Push send rejected"
                );
                if err.is_token_invalid() {
                    self.deactivate_later(token.clone());
                }
                DispatchOutcome::rejected(recipient.user_id, token, err.code(), err.to_string())
            }
        }
    }

    fn deactivate_later(&self, token: String) {
        let accounts = Arc::clone(&self.accounts);
        self.background.spawn(async move {
            match accounts.deactivate_token(&token).await {
                Ok(true) => info!(token = %redact(&token), "Deactivated invalid device token"),
                Ok(false) => info!(token = %redact(&token), "Device token already inactive"),
                Err(e) => error!(
                    token = %redact(&token),
                    error = %e,
                    "Failed to deactivate device token"
                ),
            }
        });
    }

    /// Wait for every deactivation spawned so far.
    pub async fn wait_background(&self) {
        self.background.close();
        self.background.wait().await;
        self.background.reopen();
    }
}

/// First eight characters of a token, for logs.
fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::aggregate;
    use crate::notification::testing::{Fixture, ScriptedGateway, seed};
    use vitrix_core::ErrorKind;
    use vitrix_entity::account::UserRole;
    use vitrix_entity::notification::{OutcomeStatus, OverallStatus, Target};

    fn request() -> NotificationRequest {
        NotificationRequest::new(Target::All, "Leg day", "Squats at 7")
    }

    fn recipients(tokens: &[&str]) -> Vec<Recipient> {
        tokens
            .iter()
            .map(|t| Recipient {
                user_id: uuid::Uuid::new_v4(),
                email: format!("{t}@gym.io"),
                name: None,
                tokens: vec![t.to_string()],
            })
            .collect()
    }

    #[tokio::test]
    async fn one_failing_token_does_not_affect_siblings() {
        let fx = Fixture::with_gateway(ScriptedGateway::new().failing("t3", "INTERNAL"));
        let dispatcher = fx.dispatcher();
        let recipients = recipients(&["t1", "t2", "t3", "t4", "t5"]);

        let outcomes = dispatcher
            .dispatch(&recipients, &request(), &BTreeMap::new())
            .await;

        assert_eq!(outcomes.len(), 5);
        let rejected: Vec<_> = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Rejected)
            .collect();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].token, "t3");
        assert_eq!(rejected[0].error_code.as_deref(), Some("INTERNAL"));

        let report = aggregate(&outcomes, recipients.len());
        assert_eq!((report.sent, report.failed), (4, 1));
        assert_eq!(report.overall, OverallStatus::Partial);
    }

    #[tokio::test]
    async fn not_registered_token_is_deactivated_and_others_untouched() {
        let fx = Fixture::with_gateway(
            ScriptedGateway::new()
                .failing("stale", "messaging/registration-token-not-registered")
                .failing("flaky", "UNAVAILABLE"),
        );
        let account = seed(
            &fx,
            "a@gym.io",
            UserRole::Trainee,
            &[],
            &["fresh", "stale", "flaky"],
        )
        .await;
        let dispatcher = fx.dispatcher();
        let recipient = Recipient {
            user_id: account.id,
            email: account.email.clone(),
            name: None,
            tokens: vec!["fresh".into(), "stale".into(), "flaky".into()],
        };

        let outcomes = dispatcher
            .dispatch(&[recipient], &request(), &BTreeMap::new())
            .await;
        dispatcher.wait_background().await;

        assert_eq!(outcomes.len(), 3);
        assert!(!fx.accounts.find_token("stale").await.unwrap().unwrap().active);
        assert!(fx.accounts.find_token("fresh").await.unwrap().unwrap().active);
        assert!(fx.accounts.find_token("flaky").await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn bare_error_codes_also_deactivate() {
        let fx = Fixture::with_gateway(
            ScriptedGateway::new()
                .failing("stale", "registration-token-not-registered")
                .failing("bogus", "invalid-registration-token"),
        );
        let account = seed(&fx, "b@gym.io", UserRole::Trainee, &[], &["stale", "bogus"]).await;
        let dispatcher = fx.dispatcher();
        let recipient = Recipient {
            user_id: account.id,
            email: account.email.clone(),
            name: None,
            tokens: vec!["stale".into(), "bogus".into()],
        };

        let outcomes = dispatcher
            .dispatch(&[recipient], &request(), &BTreeMap::new())
            .await;
        dispatcher.wait_background().await;

        assert_eq!(
            outcomes[0].error_code.as_deref(),
            Some("registration-token-not-registered")
        );
        assert!(!fx.accounts.find_token("stale").await.unwrap().unwrap().active);
        assert!(!fx.accounts.find_token("bogus").await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn deactivating_unknown_token_is_harmless() {
        let fx = Fixture::with_gateway(ScriptedGateway::new().failing("orphan", "UNREGISTERED"));
        let dispatcher = fx.dispatcher();

        let outcomes = dispatcher
            .dispatch(&recipients(&["orphan"]), &request(), &BTreeMap::new())
            .await;
        dispatcher.wait_background().await;

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].is_fulfilled());
    }

    #[tokio::test]
    async fn payload_carries_extra_data_and_click_action() {
        let fx = Fixture::new();
        let dispatcher = fx.dispatcher();
        let mut extra = BTreeMap::new();
        extra.insert("message_id".to_string(), "m-1".to_string());

        dispatcher
            .dispatch(&recipients(&["t1"]), &request(), &extra)
            .await;

        let sent = fx.gateway.sent();
        assert_eq!(sent.len(), 1);
        let data = &sent[0].message.data;
        assert_eq!(data.get("message_id").map(String::as_str), Some("m-1"));
        assert_eq!(
            data.get("click_action").map(String::as_str),
            Some("FLUTTER_NOTIFICATION_CLICK")
        );
    }

    #[tokio::test]
    async fn unconfigured_gateway_is_not_ready() {
        let fx = Fixture::with_gateway(ScriptedGateway::unconfigured());
        let err = fx.dispatcher().ensure_ready().unwrap_err();
        assert_eq!(err.kind, ErrorKind::GatewayUnconfigured);
    }
}
