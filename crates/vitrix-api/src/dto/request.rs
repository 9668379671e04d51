//! Request DTOs with validation.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use vitrix_core::{AppError, AppResult};
use vitrix_entity::message::{OpenType, ReceiptIdentity};
use vitrix_entity::notification::{NotificationRequest, Target};

/// Wire form of a target: the string `"all"`, or an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TargetDto {
    /// Keyword form; only `"all"` is accepted.
    Keyword(String),
    /// Object form; `type` may be omitted.
    Selector {
        /// `"individual"`, `"group"` or `"all"`.
        #[serde(rename = "type")]
        kind: Option<String>,
        /// Individual email.
        email: Option<String>,
        /// Group name.
        group: Option<String>,
    },
}

impl TargetDto {
    /// Convert into a domain target.
    pub fn into_target(self) -> AppResult<Target> {
        match self {
            Self::Keyword(keyword) if keyword.trim().eq_ignore_ascii_case("all") => {
                Ok(Target::All)
            }
            Self::Keyword(other) => Err(AppError::invalid_target(format!(
                "Unknown target '{other}'. Use \"all\" or an object with an email or group"
            ))),
            Self::Selector { kind, email, group } => {
                Target::from_parts(kind.as_deref(), email.as_deref(), group.as_deref())
            }
        }
    }
}

/// Body of `POST /notify` and the `data` of the callable adapter.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NotifyRequest {
    /// Who to notify.
    pub target: Option<TargetDto>,
    /// Notification title.
    pub title: Option<String>,
    /// Notification body.
    pub body: Option<String>,
    /// Optional image URL.
    #[serde(default, alias = "imageUrl")]
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
    /// Free-form data; non-string values are sent as their JSON text.
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

impl NotifyRequest {
    /// Validate and convert into a domain request.
    pub fn into_domain(self) -> AppResult<NotificationRequest> {
        self.validate()
            .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;

        let target = self
            .target
            .ok_or_else(|| {
                AppError::invalid_target("A target email, group, or \"all\" is required")
            })?
            .into_target()?;

        let data = self
            .data
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect();

        Ok(NotificationRequest {
            target,
            title: self.title.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
            data,
        })
    }
}

/// Body of `POST /notifications/{id}/open`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    /// Recipient email.
    pub email: Option<String>,
    /// Recipient account id.
    #[serde(alias = "user_id")]
    pub user_id: Option<String>,
    /// `"notification"` (default) or `"email"`.
    #[serde(alias = "open_type")]
    pub open_type: Option<String>,
}

impl OpenRequest {
    /// Identity and open type, validated.
    pub fn into_parts(self) -> AppResult<(ReceiptIdentity, OpenType)> {
        let identity = ReceiptIdentity::new(self.email, self.user_id)?;
        let open_type = match self.open_type.as_deref().map(str::trim) {
            None | Some("") => OpenType::default(),
            Some(raw) => raw.parse()?,
        };
        Ok((identity, open_type))
    }
}

/// Query of `GET /notifications/{id}/open.gif`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PixelQuery {
    /// Recipient email.
    pub email: Option<String>,
    /// Recipient account id.
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
}

/// Query of `GET /notifications`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    /// Maximum number of messages (default 20, max 100).
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

/// Envelope of a callable-function request: `{"data": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallableRequest<T> {
    /// Function arguments.
    pub data: T,
}
