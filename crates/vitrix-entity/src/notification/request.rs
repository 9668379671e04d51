//! Notification request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vitrix_core::{AppError, AppResult};

use super::target::Target;

/// A request to notify a target. Ephemeral; never persisted as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Who to notify.
    pub target: Target,
    /// Notification title; required, non-empty.
    pub title: String,
    /// Notification body; required, non-empty.
    pub body: String,
    /// Optional image shown with the notification.
    pub image_url: Option<String>,
    /// Free-form payload merged into the provider `data` block.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl NotificationRequest {
    /// Create a request with no image and no extra data.
    pub fn new(target: Target, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            target,
            title: title.into(),
            body: body.into(),
            image_url: None,
            data: BTreeMap::new(),
        }
    }

    /// Attach an image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Add one data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Reject requests whose title or body is blank.
    pub fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.body.trim().is_empty() {
            missing.push("body");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::missing_fields(&missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_and_body_are_reported_together() {
        let err = NotificationRequest::new(Target::All, " ", "")
            .validate()
            .unwrap_err();
        assert_eq!(err.message, "Missing required fields: title, body");
    }

    #[test]
    fn complete_request_validates() {
        let request = NotificationRequest::new(Target::All, "Leg day", "Squats at 7")
            .with_image("https://cdn.example.com/squat.png")
            .with_data("screen", "workouts");
        assert!(request.validate().is_ok());
        assert_eq!(request.data.get("screen").map(String::as_str), Some("workouts"));
    }
}
