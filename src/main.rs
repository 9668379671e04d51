//! Vitrix Server: push notifications and read receipts.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use vitrix_api::AppState;
use vitrix_core::config::AppConfig;
use vitrix_core::error::AppError;
use vitrix_database::Stores;
use vitrix_push::HttpPushGateway;

#[tokio::main]
async fn main() {
    let env = std::env::var("VITRIX_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Vitrix v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores (+ migrations for postgres) ───────────────
    tracing::info!(provider = config.database.provider.as_str(), "Initializing stores...");
    let stores = Stores::from_config(&config.database).await?;

    // ── Step 2: Push gateway ─────────────────────────────────────
    let gateway = HttpPushGateway::from_config(&config.push)?;
    if config.push.is_configured() {
        tracing::info!(endpoint = %config.push.endpoint, "Push gateway configured");
    } else {
        tracing::warn!("Push gateway credential missing; /notify will fail until one is set");
    }

    // ── Step 3: Services + HTTP server ───────────────────────────
    let state = AppState::build(config, stores, Arc::new(gateway));
    vitrix_api::run_server(state).await
}
