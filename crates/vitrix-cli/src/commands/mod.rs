//! CLI command definitions and dispatch.

pub mod message;
pub mod migrate;
pub mod notify;

use clap::{Parser, Subcommand};

use vitrix_core::config::AppConfig;
use vitrix_core::error::AppError;
use vitrix_database::DatabasePool;

use crate::output::OutputFormat;

/// Vitrix: push notifications and read receipts for the gym app
#[derive(Debug, Parser)]
#[command(name = "vitrix", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Send a notification through a running server
    Notify(notify::NotifyArgs),
    /// Inspect recorded broadcasts
    Message(message::MessageArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config, self.format).await,
            Commands::Notify(args) => notify::execute(args, &self.config, self.format).await,
            Commands::Message(args) => message::execute(args, &self.config, self.format).await,
        }
    }
}

/// Load configuration from file plus `VITRIX__*` overrides.
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_file(config_path)
}

/// Open the PostgreSQL pool named by the configuration.
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Base URL of the server, from `--server` or the configured port.
pub fn server_url(explicit: Option<&str>, config: &AppConfig) -> String {
    match explicit {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => format!("http://127.0.0.1:{}", config.server.port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_url_prefers_flag() {
        let config = AppConfig::default();
        assert_eq!(server_url(None, &config), "http://127.0.0.1:8080");
        assert_eq!(
            server_url(Some("https://push.gym.io/"), &config),
            "https://push.gym.io"
        );
    }

    #[test]
    fn parses_notify_command() {
        let cli = Cli::try_parse_from([
            "vitrix",
            "notify",
            "--group",
            "Morning Squad",
            "--title",
            "Leg day",
            "--body",
            "Squats at 7",
            "--data",
            "screen=workout",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Notify(_)));

        assert!(
            Cli::try_parse_from(["vitrix", "notify", "--title", "t", "--body", "b"]).is_err()
        );
    }
}
