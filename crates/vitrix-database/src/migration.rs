//! Schema migrations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use vitrix_core::error::{AppError, ErrorKind};

/// Apply every pending migration under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database schema is up to date");
    Ok(())
}

/// A row of the sqlx migration ledger.
#[derive(Debug, Clone)]
pub struct AppliedMigration {
    /// Migration version (timestamp prefix of the file name).
    pub version: i64,
    /// Description derived from the file name.
    pub description: String,
    /// Whether the migration completed.
    pub success: bool,
    /// When it was applied.
    pub installed_on: DateTime<Utc>,
}

/// List applied migrations, oldest first.
pub async fn applied_migrations(pool: &PgPool) -> Result<Vec<AppliedMigration>, AppError> {
    let rows: Vec<(i64, String, bool, DateTime<Utc>)> = sqlx::query_as(
        "SELECT version, description, success, installed_on FROM _sqlx_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to read migration ledger: {e}"),
            e,
        )
    })?;

    Ok(rows
        .into_iter()
        .map(|(version, description, success, installed_on)| AppliedMigration {
            version,
            description,
            success,
            installed_on,
        })
        .collect())
}
