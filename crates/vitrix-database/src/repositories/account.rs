//! Account and device token repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vitrix_core::error::{AppError, ErrorKind};
use vitrix_core::result::AppResult;
use vitrix_entity::account::{Account, DeviceToken};

use crate::store::AccountStore;

/// PostgreSQL-backed [`AccountStore`].
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(email) = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    async fn find_by_group(&self, group: &str) -> AppResult<Vec<Account>> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE $1 = ANY(groups) ORDER BY created_at, email",
        )
        .bind(group)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list accounts by group", e)
        })
    }

    async fn find_all(&self) -> AppResult<Vec<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created_at, email")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list accounts", e))
    }

    async fn active_tokens(&self, account_ids: &[Uuid]) -> AppResult<Vec<DeviceToken>> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, DeviceToken>(
            "SELECT * FROM device_tokens WHERE active AND account_id = ANY($1) ORDER BY created_at",
        )
        .bind(account_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load active tokens", e)
        })
    }

    async fn find_token(&self, token: &str) -> AppResult<Option<DeviceToken>> {
        sqlx::query_as::<_, DeviceToken>("SELECT * FROM device_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find token", e))
    }

    async fn deactivate_token(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE device_tokens SET active = FALSE, updated_at = NOW() \
             WHERE token = $1 AND active",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to deactivate token", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_account(&self, account: &Account) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, email, display_name, role, groups, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.display_name)
        .bind(account.role)
        .bind(&account.groups)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db) = e {
                if db.is_unique_violation() {
                    return AppError::conflict(format!(
                        "An account with email '{}' already exists",
                        account.email
                    ));
                }
            }
            AppError::with_source(ErrorKind::Database, "Failed to create account", e)
        })
    }

    async fn register_token(&self, token: &DeviceToken) -> AppResult<DeviceToken> {
        sqlx::query_as::<_, DeviceToken>(
            "INSERT INTO device_tokens (token, account_id, platform, active, created_at, updated_at) \
             VALUES ($1, $2, $3, TRUE, $4, $5) \
             ON CONFLICT (token) DO UPDATE SET account_id = EXCLUDED.account_id, \
             platform = EXCLUDED.platform, active = TRUE, updated_at = NOW() \
             RETURNING *",
        )
        .bind(&token.token)
        .bind(token.account_id)
        .bind(&token.platform)
        .bind(token.created_at)
        .bind(token.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to register token", e))
    }
}
