//! # vitrix-database
//!
//! Store traits for accounts, device tokens and broadcast messages, with a
//! PostgreSQL implementation (sqlx) and an in-memory implementation used
//! for local runs and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use tracing::info;

use vitrix_core::config::{DatabaseConfig, StoreProvider};
use vitrix_core::result::AppResult;

pub use connection::DatabasePool;
pub use store::{AccountStore, MessageStore, ReceiptWrite};

/// The store handles shared by the service layer.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Accounts and device tokens.
    pub accounts: Arc<dyn AccountStore>,
    /// Broadcast messages and read receipts.
    pub messages: Arc<dyn MessageStore>,
    /// Connection pool, when backed by PostgreSQL.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Fresh, empty in-memory stores.
    pub fn memory() -> Self {
        Self {
            accounts: Arc::new(memory::MemoryAccountStore::new()),
            messages: Arc::new(memory::MemoryMessageStore::new()),
            pool: None,
        }
    }

    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            accounts: Arc::new(repositories::AccountRepository::new(pg.clone())),
            messages: Arc::new(repositories::MessageRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Build stores for the configured provider, running migrations for PostgreSQL.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            StoreProvider::Memory => {
                info!("Using in-memory stores");
                Ok(Self::memory())
            }
            StoreProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                migration::run_migrations(pool.pool()).await?;
                Ok(Self::postgres(pool))
            }
        }
    }

    /// Name of the backing provider.
    pub fn provider(&self) -> StoreProvider {
        if self.pool.is_some() {
            StoreProvider::Postgres
        } else {
            StoreProvider::Memory
        }
    }
}
