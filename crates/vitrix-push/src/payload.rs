//! Provider message envelope.
//!
//! One envelope is built per device token. Field names follow the
//! provider's v1 send API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vitrix_entity::notification::NotificationRequest;

/// Data key telling the mobile client which handler to open.
pub const CLICK_ACTION_KEY: &str = "click_action";
/// Value of [`CLICK_ACTION_KEY`]; always overrides caller data.
pub const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";
/// Android channel notifications are posted to.
pub const ANDROID_CHANNEL_ID: &str = "high_importance_channel";

/// Top-level send body: `{"message": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    /// The message for one token.
    pub message: Envelope,
}

/// A message addressed to one device token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Destination device token.
    pub token: String,
    /// Cross-platform notification block.
    pub notification: Notification,
    /// Key/value payload delivered to the app.
    pub data: BTreeMap<String, String>,
    /// Android overrides.
    pub android: AndroidConfig,
    /// APNs overrides.
    pub apns: ApnsConfig,
}

/// Cross-platform notification block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Title.
    pub title: String,
    /// Body.
    pub body: String,
    /// Image URL, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Android overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndroidConfig {
    /// Delivery priority.
    pub priority: String,
    /// Android notification options.
    pub notification: AndroidNotification,
}

/// Android notification options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndroidNotification {
    /// Channel id.
    pub channel_id: String,
    /// Sound name.
    pub sound: String,
}

/// APNs overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApnsConfig {
    /// APNs payload.
    pub payload: ApnsPayload,
}

/// APNs payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApnsPayload {
    /// The `aps` dictionary.
    pub aps: Aps,
}

/// The `aps` dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aps {
    /// Alert text.
    pub alert: ApsAlert,
    /// Sound name.
    pub sound: String,
    /// Badge count.
    pub badge: u32,
}

/// APNs alert text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApsAlert {
    /// Title.
    pub title: String,
    /// Body.
    pub body: String,
}

impl PushMessage {
    /// Build the envelope for one token.
    ///
    /// `extra` entries (such as a recorded message id) are merged after the
    /// request data; the click action is applied last.
    pub fn build(
        token: &str,
        request: &NotificationRequest,
        extra: &BTreeMap<String, String>,
    ) -> Self {
        let mut data = request.data.clone();
        data.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        data.insert(CLICK_ACTION_KEY.to_string(), CLICK_ACTION.to_string());

        Self {
            message: Envelope {
                token: token.to_string(),
                notification: Notification {
                    title: request.title.clone(),
                    body: request.body.clone(),
                    image: request.image_url.clone(),
                },
                data,
                android: AndroidConfig {
                    priority: "high".to_string(),
                    notification: AndroidNotification {
                        channel_id: ANDROID_CHANNEL_ID.to_string(),
                        sound: "default".to_string(),
                    },
                },
                apns: ApnsConfig {
                    payload: ApnsPayload {
                        aps: Aps {
                            alert: ApsAlert {
                                title: request.title.clone(),
                                body: request.body.clone(),
                            },
                            sound: "default".to_string(),
                            badge: 1,
                        },
                    },
                },
            },
        }
    }

    /// The destination token.
    pub fn token(&self) -> &str {
        &self.message.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vitrix_entity::notification::Target;

    #[test]
    fn envelope_shape() {
        let request = NotificationRequest::new(Target::All, "Leg day", "Squats at 7")
            .with_image("https://cdn.gym.io/squat.png")
            .with_data("screen", "workouts")
            .with_data(CLICK_ACTION_KEY, "OVERRIDE_ME");
        let mut extra = BTreeMap::new();
        extra.insert("message_id".to_string(), "m-1".to_string());

        let value = serde_json::to_value(PushMessage::build("tok-1", &request, &extra)).unwrap();
        assert_eq!(
            value,
            json!({
                "message": {
                    "token": "tok-1",
                    "notification": {
                        "title": "Leg day",
                        "body": "Squats at 7",
                        "image": "https://cdn.gym.io/squat.png"
                    },
                    "data": {
                        "click_action": "FLUTTER_NOTIFICATION_CLICK",
                        "message_id": "m-1",
                        "screen": "workouts"
                    },
                    "android": {
                        "priority": "high",
                        "notification": {
                            "channel_id": "high_importance_channel",
                            "sound": "default"
                        }
                    },
                    "apns": {
                        "payload": {
                            "aps": {
                                "alert": {"title": "Leg day", "body": "Squats at 7"},
                                "sound": "default",
                                "badge": 1
                            }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn image_is_omitted_when_absent() {
        let request = NotificationRequest::new(Target::All, "t", "b");
        let value =
            serde_json::to_value(PushMessage::build("tok", &request, &BTreeMap::new())).unwrap();
        assert!(value["message"]["notification"].get("image").is_none());
    }
}
