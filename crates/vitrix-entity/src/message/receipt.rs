//! Read receipt records and the identity used to address them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrix_core::{AppError, AppResult};

/// How a recipient opened a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenType {
    /// The push notification was tapped.
    #[default]
    Notification,
    /// The email copy was opened.
    Email,
}

impl OpenType {
    /// Return the open type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notification => "notification",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for OpenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpenType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "notification" => Ok(Self::Notification),
            "email" => Ok(Self::Email),
            other => Err(AppError::validation(format!(
                "Invalid openType '{other}'. Expected 'notification' or 'email'"
            ))),
        }
    }
}

/// The identity a receipt update is addressed by.
///
/// At least one of `email` and `user_id` is present. When both are, the
/// email is used for matching, falling back to the user id for receipts
/// that were recorded without an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptIdentity {
    /// Recipient email.
    pub email: Option<String>,
    /// Recipient account id, as supplied by the client.
    pub user_id: Option<String>,
}

impl ReceiptIdentity {
    /// Build an identity, treating blank strings as absent.
    pub fn new(email: Option<String>, user_id: Option<String>) -> AppResult<Self> {
        let email = email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        let user_id = user_id
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        if email.is_none() && user_id.is_none() {
            return Err(AppError::missing_identity());
        }
        Ok(Self { email, user_id })
    }

    /// Whether a receipt belongs to this identity.
    pub fn matches(&self, receipt: &ReadReceipt) -> bool {
        let same_user_id = || {
            self.user_id
                .as_deref()
                .is_some_and(|id| receipt.user_id.as_deref() == Some(id))
        };
        match (&self.email, receipt.user_email.as_deref()) {
            (Some(email), Some(stored)) => stored.eq_ignore_ascii_case(email),
            _ => same_user_id(),
        }
    }

    /// Key used for directory lookups and logs.
    pub fn key(&self) -> &str {
        self.email
            .as_deref()
            .or(self.user_id.as_deref())
            .unwrap_or_default()
    }
}

/// Per-recipient read state of a broadcast message.
///
/// Every flag only ever moves from `false` to `true`, and a timestamp is
/// written exactly once, when its flag first flips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReceipt {
    /// Recipient email, if known.
    pub user_email: Option<String>,
    /// Recipient account id, if known.
    pub user_id: Option<String>,
    /// Display name captured when the receipt was created.
    pub user_name: String,
    /// Opened through any channel.
    pub is_read: bool,
    /// First time the message was opened through any channel.
    pub read_timestamp: Option<DateTime<Utc>>,
    /// Opened through the push notification.
    pub notification_opened: bool,
    /// First push open.
    pub notification_opened_timestamp: Option<DateTime<Utc>>,
    /// Opened through email.
    pub email_opened: bool,
    /// First email open.
    pub email_opened_timestamp: Option<DateTime<Utc>>,
}

impl ReadReceipt {
    /// An unread receipt, as seeded when a broadcast is recorded.
    pub fn unread(
        user_email: Option<String>,
        user_id: Option<String>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            user_email,
            user_id,
            user_name: user_name.into(),
            is_read: false,
            read_timestamp: None,
            notification_opened: false,
            notification_opened_timestamp: None,
            email_opened: false,
            email_opened_timestamp: None,
        }
    }

    /// Record an open. Flags already set keep their original timestamps.
    pub fn mark_opened(&mut self, open_type: OpenType, at: DateTime<Utc>) {
        if !self.is_read {
            self.is_read = true;
            self.read_timestamp = Some(at);
        }
        match open_type {
            OpenType::Notification if !self.notification_opened => {
                self.notification_opened = true;
                self.notification_opened_timestamp = Some(at);
            }
            OpenType::Email if !self.email_opened => {
                self.email_opened = true;
                self.email_opened_timestamp = Some(at);
            }
            _ => {}
        }
    }

    /// Whether the given channel has been opened.
    pub fn is_opened(&self, open_type: OpenType) -> bool {
        match open_type {
            OpenType::Notification => self.notification_opened,
            OpenType::Email => self.email_opened,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn open_type_parsing() {
        assert_eq!("Email".parse::<OpenType>().unwrap(), OpenType::Email);
        assert_eq!(
            "notification".parse::<OpenType>().unwrap(),
            OpenType::Notification
        );
        assert!("sms".parse::<OpenType>().is_err());
    }

    #[test]
    fn identity_requires_email_or_user_id() {
        assert!(ReceiptIdentity::new(Some("  ".into()), None).is_err());
        let id = ReceiptIdentity::new(None, Some("u1".into())).unwrap();
        assert_eq!(id.key(), "u1");
    }

    #[test]
    fn email_takes_precedence_when_matching() {
        let receipt = ReadReceipt::unread(Some("A@x.com".into()), Some("u1".into()), "A");
        let by_email = ReceiptIdentity::new(Some("a@X.com".into()), Some("other".into())).unwrap();
        assert!(by_email.matches(&receipt));

        let wrong_email = ReceiptIdentity::new(Some("b@x.com".into()), Some("u1".into())).unwrap();
        assert!(!wrong_email.matches(&receipt));

        let by_id = ReceiptIdentity::new(None, Some("u1".into())).unwrap();
        assert!(by_id.matches(&receipt));
    }

    #[test]
    fn email_identity_falls_back_to_user_id_for_email_less_receipt() {
        let receipt = ReadReceipt::unread(None, Some("u1".into()), "unknown");
        let both = ReceiptIdentity::new(Some("a@x.com".into()), Some("u1".into())).unwrap();
        assert!(both.matches(&receipt));

        let other = ReceiptIdentity::new(Some("a@x.com".into()), Some("u2".into())).unwrap();
        assert!(!other.matches(&receipt));
        let email_only = ReceiptIdentity::new(Some("a@x.com".into()), None).unwrap();
        assert!(!email_only.matches(&receipt));
    }

    #[test]
    fn mark_opened_is_monotonic() {
        let t1 = Utc::now();
        let t2 = t1 + Duration::minutes(5);
        let mut receipt = ReadReceipt::unread(Some("a@x.com".into()), None, "A");

        receipt.mark_opened(OpenType::Notification, t1);
        receipt.mark_opened(OpenType::Notification, t2);
        assert_eq!(receipt.read_timestamp, Some(t1));
        assert_eq!(receipt.notification_opened_timestamp, Some(t1));
        assert!(!receipt.email_opened);

        receipt.mark_opened(OpenType::Email, t2);
        assert!(receipt.email_opened);
        assert_eq!(receipt.email_opened_timestamp, Some(t2));
        assert_eq!(receipt.read_timestamp, Some(t1));
    }
}
