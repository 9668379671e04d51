//! Device token entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A push-delivery token for one installed app instance.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceToken {
    /// Opaque token issued by the push gateway.
    pub token: String,
    /// Owning account.
    pub account_id: Uuid,
    /// Client platform (`"android"`, `"ios"`, `"web"`), if reported.
    pub platform: Option<String>,
    /// Cleared when the gateway reports the token as invalid or unregistered.
    pub active: bool,
    /// When the token was registered.
    pub created_at: DateTime<Utc>,
    /// When the token was last updated.
    pub updated_at: DateTime<Utc>,
}

impl DeviceToken {
    /// Create a new active token for an account.
    pub fn new(account_id: Uuid, token: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            token: token.into(),
            account_id,
            platform: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style helper marking the token inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
