//! Push gateway abstraction.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::PushError;
use crate::payload::PushMessage;

/// Sends one message to one device token.
#[async_trait]
pub trait PushGateway: Send + Sync + Debug + 'static {
    /// Whether a credential is available. Sends fail fast when it is not.
    fn is_configured(&self) -> bool;

    /// Send one message. Returns the provider's message name on success.
    async fn send(&self, message: &PushMessage) -> Result<String, PushError>;
}
