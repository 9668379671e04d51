//! Notification dispatch and read-receipt settings.

use serde::{Deserialize, Serialize};

/// Dispatch and receipt reconciliation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Persist a message with initial receipts for group and "all" broadcasts.
    #[serde(default = "default_true")]
    pub record_broadcasts: bool,
    /// How many times a receipt update is re-applied after a version conflict.
    #[serde(default = "default_reconcile_attempts")]
    pub reconcile_max_attempts: u32,
    /// How long resolved display names stay cached, in seconds.
    #[serde(default = "default_directory_ttl")]
    pub directory_ttl_seconds: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            record_broadcasts: true,
            reconcile_max_attempts: default_reconcile_attempts(),
            directory_ttl_seconds: default_directory_ttl(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_reconcile_attempts() -> u32 {
    5
}

fn default_directory_ttl() -> u64 {
    600
}
