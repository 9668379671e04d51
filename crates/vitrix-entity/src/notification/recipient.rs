//! Resolved notification recipient.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account plus its currently active device tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Account id.
    pub user_id: Uuid,
    /// Account email.
    pub email: String,
    /// Display name, if the account has one.
    pub name: Option<String>,
    /// Active device tokens; may be empty for an individually addressed account.
    pub tokens: Vec<String>,
}

impl Recipient {
    /// Whether at least one active token exists.
    pub fn is_reachable(&self) -> bool {
        !self.tokens.is_empty()
    }
}
