//! Inspect recorded broadcasts and their read receipts.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use uuid::Uuid;

use vitrix_core::error::AppError;
use vitrix_entity::message::{ReadReceipt, ReadSummary};

use crate::output::{self, OutputFormat};

/// Arguments for the message command
#[derive(Debug, Args)]
pub struct MessageArgs {
    /// Server base URL (defaults to the configured port on localhost)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Message subcommand
    #[command(subcommand)]
    pub command: MessageCommand,
}

/// Message subcommands
#[derive(Debug, Subcommand)]
pub enum MessageCommand {
    /// Show one message with its receipts
    Show {
        /// Message id
        id: Uuid,
    },
    /// List recent messages
    List {
        /// Number of messages
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct MessageView {
    id: Uuid,
    title: String,
    body: String,
    target: String,
    created_at: DateTime<Utc>,
    summary: ReadSummary,
    read_receipts: Vec<ReadReceipt>,
}

#[derive(Debug, Serialize, Deserialize, Tabled)]
struct MessageListRow {
    id: Uuid,
    title: String,
    target: String,
    #[tabled(skip)]
    created_at: DateTime<Utc>,
    #[serde(skip_deserializing)]
    read: String,
    #[serde(default)]
    #[tabled(skip)]
    summary: ReadSummary,
}

#[derive(Debug, Serialize, Tabled)]
struct ReceiptRow {
    name: String,
    email: String,
    read: bool,
    read_at: String,
    notification: bool,
    email_opened: bool,
}

fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".to_string())
}

impl From<&ReadReceipt> for ReceiptRow {
    fn from(r: &ReadReceipt) -> Self {
        Self {
            name: r.user_name.clone(),
            email: r
                .user_email
                .clone()
                .or_else(|| r.user_id.clone())
                .unwrap_or_else(|| "-".to_string()),
            read: r.is_read,
            read_at: timestamp(r.read_timestamp),
            notification: r.notification_opened,
            email_opened: r.email_opened,
        }
    }
}

async fn fetch<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, AppError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| AppError::external(format!("Request to {url} failed: {e}")))?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(AppError::not_found(format!("Nothing at {url}")));
    }
    if !status.is_success() {
        return Err(AppError::external(format!("Server answered {status}")));
    }

    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|e| AppError::external(format!("Unexpected response: {e}")))?;
    Ok(envelope.data)
}

/// Execute message commands
pub async fn execute(
    args: &MessageArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let base = super::server_url(args.server.as_deref(), &config);

    match &args.command {
        MessageCommand::Show { id } => {
            let message: MessageView = fetch(&format!("{base}/notifications/{id}")).await?;
            if format == OutputFormat::Json {
                output::print_json(&message);
                return Ok(());
            }

            output::print_kv("Id", &message.id.to_string());
            output::print_kv("Title", &message.title);
            output::print_kv("Target", &message.target);
            output::print_kv("Created", &message.created_at.to_rfc3339());
            output::print_kv(
                "Read",
                &format!("{}/{}", message.summary.read, message.summary.total),
            );
            let rows: Vec<ReceiptRow> = message.read_receipts.iter().map(Into::into).collect();
            output::print_list(&rows, format);
        }
        MessageCommand::List { limit } => {
            let mut rows: Vec<MessageListRow> =
                fetch(&format!("{base}/notifications?limit={limit}")).await?;
            for row in &mut rows {
                row.read = format!("{}/{}", row.summary.read, row.summary.total);
            }
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_row_falls_back_to_user_id() {
        let receipt = ReadReceipt::unread(None, Some("u-42".into()), "unknown");
        let row = ReceiptRow::from(&receipt);
        assert_eq!(row.email, "u-42");
        assert_eq!(row.read_at, "-");
        assert!(!row.read);
    }
}
