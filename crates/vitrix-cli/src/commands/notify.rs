//! Send a notification through the HTTP API.
//!
//! The server never retries a dispatch on its own; this command retries the
//! whole request on 5xx answers and network errors with exponential backoff.

use std::time::Duration;

use clap::{ArgGroup, Args};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::warn;
use uuid::Uuid;

use vitrix_core::error::AppError;
use vitrix_entity::notification::OverallStatus;

use crate::output::{self, OutputFormat};

/// Arguments for the notify command
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["email", "group", "all"])))]
pub struct NotifyArgs {
    /// Notify one account by email
    #[arg(long)]
    pub email: Option<String>,
    /// Notify every trainee in a group
    #[arg(long)]
    pub group: Option<String>,
    /// Notify every trainee
    #[arg(long)]
    pub all: bool,
    /// Notification title
    #[arg(short, long)]
    pub title: String,
    /// Notification body
    #[arg(short, long)]
    pub body: String,
    /// Image URL
    #[arg(long)]
    pub image: Option<String>,
    /// Extra data as key=value (repeatable)
    #[arg(long = "data", value_parser = parse_key_value)]
    pub data: Vec<(String, String)>,
    /// Retries on server or network errors
    #[arg(long, default_value_t = 3)]
    pub retries: u32,
    /// Server base URL (defaults to the configured port on localhost)
    #[arg(long)]
    pub server: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NotifyOutcome {
    requested: u64,
    sent: u64,
    failed: u64,
    overall: OverallStatus,
    #[serde(default)]
    message_id: Option<Uuid>,
}

/// Parse `key=value`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

/// Request body for `POST /notify`.
pub fn request_body(args: &NotifyArgs) -> Value {
    let target = match (&args.email, &args.group) {
        (Some(email), _) => json!({"type": "individual", "email": email}),
        (None, Some(group)) => json!({"type": "group", "group": group}),
        (None, None) => json!("all"),
    };

    let data: Map<String, Value> = args
        .data
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    let mut body = json!({
        "target": target,
        "title": args.title,
        "body": args.body,
        "data": data,
    });
    if let Some(image) = &args.image {
        body["image_url"] = Value::String(image.clone());
    }
    body
}

/// Whether an answer is worth retrying.
pub fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error()
}

/// Delay before retry number `attempt` (0-based): 500ms, 1s, 2s, ... capped at 32s.
pub fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(500 * (1u64 << attempt.min(6)))
}

fn error_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or("no message")
        .to_string()
}

async fn post_with_retries(url: &str, body: &Value, retries: u32) -> Result<Value, AppError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

    let mut attempt = 0;
    loop {
        match client.post(url).json(body).send().await {
            Ok(response) => {
                let status = response.status();
                let payload: Value = response.json().await.unwrap_or(Value::Null);
                if status.is_success() {
                    return Ok(payload);
                }
                if !is_retryable(status) || attempt >= retries {
                    return Err(AppError::external(format!(
                        "Server answered {status}: {}",
                        error_message(&payload)
                    )));
                }
                warn!(status = status.as_u16(), attempt, "Notify failed, retrying");
            }
            Err(e) if attempt < retries => {
                warn!(error = %e, attempt, "Notify request failed, retrying");
            }
            Err(e) => {
                return Err(AppError::external(format!("Notify request failed: {e}")));
            }
        }

        tokio::time::sleep(backoff(attempt)).await;
        attempt += 1;
    }
}

/// Execute the notify command
pub async fn execute(
    args: &NotifyArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let url = format!(
        "{}/notify",
        super::server_url(args.server.as_deref(), &config)
    );

    let payload = post_with_retries(&url, &request_body(args), args.retries).await?;

    match format {
        OutputFormat::Json => output::print_json(&payload),
        OutputFormat::Table => {
            let outcome: NotifyOutcome = serde_json::from_value(payload)?;
            output::print_kv("Overall", outcome.overall.as_str());
            output::print_kv("Requested", &outcome.requested.to_string());
            output::print_kv("Sent", &outcome.sent.to_string());
            output::print_kv("Failed", &outcome.failed.to_string());
            if let Some(id) = outcome.message_id {
                output::print_kv("Message", &id.to_string());
            }
            match outcome.overall {
                OverallStatus::Success => output::print_success("Delivered to every recipient."),
                OverallStatus::Partial => output::print_warning("Some recipients were not reached."),
                OverallStatus::Failure => output::print_warning("No recipient was reached."),
            }
        }
    }

    Ok(())
}
