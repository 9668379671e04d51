//! Per-send push errors.

use thiserror::Error;

/// Provider codes meaning the device token will never work again.
///
/// Matched with or without the `messaging/` namespace.
pub const INVALID_TOKEN_CODES: &[&str] = &[
    "invalid-registration-token",
    "registration-token-not-registered",
    "UNREGISTERED",
];

const CODE_NAMESPACE: &str = "messaging/";

/// Why a single push send failed.
///
/// These never abort a dispatch; each one becomes a rejected outcome for
/// its token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    /// The gateway answered with a non-success status.
    #[error("push gateway rejected the message ({code}): {message}")]
    Rejected {
        /// HTTP status returned by the gateway.
        status: u16,
        /// Provider error code.
        code: String,
        /// Provider error message.
        message: String,
    },
    /// The request never produced a response.
    #[error("push gateway request failed: {0}")]
    Transport(String),
    /// No credential is configured.
    #[error("push gateway credential is not configured")]
    Unconfigured,
}

impl PushError {
    /// Provider error code, or a local code for non-provider failures.
    pub fn code(&self) -> &str {
        match self {
            Self::Rejected { code, .. } => code,
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Unconfigured => "GATEWAY_UNCONFIGURED",
        }
    }

    /// Whether the token should be deactivated.
    pub fn is_token_invalid(&self) -> bool {
        let code = self.code();
        let bare = code.strip_prefix(CODE_NAMESPACE).unwrap_or(code);
        INVALID_TOKEN_CODES.contains(&bare)
    }
}
