//! Delivery report returned to the caller of a dispatch.

use serde::{Deserialize, Serialize};

/// Overall classification of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    /// Every requested recipient got at least one push.
    Success,
    /// Some, but not all, recipients got a push.
    Partial,
    /// Nobody got a push.
    Failure,
}

impl OverallStatus {
    /// Classify by recipients reached versus recipients requested.
    pub fn classify(sent: u64, requested: u64) -> Self {
        if sent == 0 {
            Self::Failure
        } else if sent < requested {
            Self::Partial
        } else {
            Self::Success
        }
    }

    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Partial => "Partial",
            Self::Failure => "Failure",
        }
    }
}

/// Summary of a dispatch, counted in recipients rather than tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Recipients resolved for the request.
    pub requested: u64,
    /// Recipients with at least one fulfilled token.
    pub sent: u64,
    /// Recipients with no fulfilled token.
    pub failed: u64,
    /// Overall classification.
    pub overall: OverallStatus,
}
