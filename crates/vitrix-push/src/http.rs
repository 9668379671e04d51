//! HTTP push gateway.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use vitrix_core::config::PushConfig;
use vitrix_core::error::{AppError, ErrorKind};
use vitrix_core::result::AppResult;

use crate::error::PushError;
use crate::gateway::PushGateway;
use crate::payload::PushMessage;

/// [`PushGateway`] that POSTs envelopes to the provider's send endpoint
/// with a bearer credential.
#[derive(Clone)]
pub struct HttpPushGateway {
    client: reqwest::Client,
    endpoint: String,
    credential: Option<String>,
}

impl std::fmt::Debug for HttpPushGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPushGateway")
            .field("endpoint", &self.endpoint)
            .field("configured", &self.is_configured())
            .finish_non_exhaustive()
    }
}

impl HttpPushGateway {
    /// Build a gateway from configuration. A missing credential is not an
    /// error here; sends report it instead.
    pub fn from_config(config: &PushConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build push HTTP client: {e}"),
                    e,
                )
            })?;

        let credential = config
            .credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            credential,
        })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    async fn send(&self, message: &PushMessage) -> Result<String, PushError> {
        let Some(credential) = self.credential.as_deref() else {
            return Err(PushError::Unconfigured);
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Push request failed before a response");
                PushError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        if status.is_success() {
            let name = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("name")?.as_str().map(String::from))
                .unwrap_or_default();
            debug!(name = %name, "Push accepted");
            return Ok(name);
        }

        let error = parse_error(status.as_u16(), &body);
        debug!(status = status.as_u16(), code = error.code(), "Push rejected");
        Err(error)
    }
}

/// Extract the most specific error code from a provider error body.
///
/// Preference order: `error.details[].errorCode`, a string `error.code`,
/// `error.status`, then the bare HTTP status.
fn parse_error(status: u16, body: &str) -> PushError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    let detail_code = error
        .and_then(|e| e.get("details")?.as_array().cloned())
        .and_then(|details| {
            details
                .iter()
                .find_map(|d| d.get("errorCode")?.as_str().map(String::from))
        });

    let code = detail_code
        .or_else(|| error.and_then(|e| e.get("code")?.as_str().map(String::from)))
        .or_else(|| error.and_then(|e| e.get("status")?.as_str().map(String::from)))
        .unwrap_or_else(|| format!("HTTP_{status}"));

    let message = error
        .and_then(|e| e.get("message")?.as_str().map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect());

    PushError::Rejected {
        status,
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use axum::Json;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use serde_json::json;
    use vitrix_entity::notification::{NotificationRequest, Target};

    #[test]
    fn parses_detail_error_code_first() {
        let body = json!({
            "error": {
                "code": 404,
                "message": "Requested entity was not found.",
                "status": "NOT_FOUND",
                "details": [{"@type": "FcmError", "errorCode": "UNREGISTERED"}]
            }
        })
        .to_string();
        let err = parse_error(404, &body);
        assert_eq!(err.code(), "UNREGISTERED");
        assert!(err.is_token_invalid());
    }

    #[test]
    fn falls_back_to_string_code_then_status() {
        let err = parse_error(
            400,
            r#"{"error":{"code":"messaging/invalid-registration-token","message":"bad"}}"#,
        );
        assert!(err.is_token_invalid());

        let err = parse_error(503, r#"{"error":{"code":503,"status":"UNAVAILABLE"}}"#);
        assert_eq!(err.code(), "UNAVAILABLE");

        let err = parse_error(502, "<html>bad gateway</html>");
        assert_eq!(err.code(), "HTTP_502");
    }

    async fn handler(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer secret");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": {"status": "UNAUTHENTICATED"}})));
        }
        match body["message"]["token"].as_str() {
            Some("good") => (
                StatusCode::OK,
                Json(json!({"name": "projects/vitrix/messages/1"})),
            ),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"code": 404, "details": [{"errorCode": "UNREGISTERED"}]}})),
            ),
        }
    }

    async fn spawn_provider() -> String {
        let app = Router::new().route("/send", post(handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/send")
    }

    fn config(endpoint: String, credential: Option<&str>) -> PushConfig {
        PushConfig {
            endpoint,
            credential: credential.map(String::from),
            request_timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn sends_with_bearer_credential() {
        let endpoint = spawn_provider().await;
        let gateway = HttpPushGateway::from_config(&config(endpoint, Some("secret"))).unwrap();
        let request = NotificationRequest::new(Target::All, "t", "b");

        let ok = gateway
            .send(&PushMessage::build("good", &request, &BTreeMap::new()))
            .await
            .unwrap();
        assert_eq!(ok, "projects/vitrix/messages/1");

        let err = gateway
            .send(&PushMessage::build("stale", &request, &BTreeMap::new()))
            .await
            .unwrap_err();
        assert!(err.is_token_invalid());
    }

    #[tokio::test]
    async fn blank_credential_is_unconfigured() {
        let gateway =
            HttpPushGateway::from_config(&config("http://127.0.0.1:1/send".into(), Some("  ")))
                .unwrap();
        assert!(!gateway.is_configured());
        let request = NotificationRequest::new(Target::All, "t", "b");
        let err = gateway
            .send(&PushMessage::build("good", &request, &BTreeMap::new()))
            .await
            .unwrap_err();
        assert_eq!(err, PushError::Unconfigured);
    }
}
