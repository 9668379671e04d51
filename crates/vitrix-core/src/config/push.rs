//! Push gateway configuration.

use serde::{Deserialize, Serialize};

/// Push gateway (HTTP messaging API) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Send endpoint; one POST is issued here per device token.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer credential for the gateway. Without it nothing is sent.
    #[serde(default)]
    pub credential: Option<String>,
    /// Timeout for a single send in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            credential: None,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl PushConfig {
    /// Whether a non-blank credential is present.
    pub fn is_configured(&self) -> bool {
        self.credential
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

fn default_endpoint() -> String {
    "https://fcm.googleapis.com/v1/projects/vitrix/messages:send".to_string()
}

fn default_request_timeout() -> u64 {
    10
}
