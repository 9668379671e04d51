//! Broadcast message repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use vitrix_core::error::{AppError, ErrorKind};
use vitrix_core::result::AppResult;
use vitrix_entity::message::{Message, ReadReceipt};

use crate::store::{MessageStore, ReceiptWrite};

/// Row shape of the `messages` table; receipts live in a JSONB column.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    title: String,
    body: String,
    target: String,
    read_receipts: Json<Vec<ReadReceipt>>,
    version: i64,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            target: row.target,
            read_receipts: row.read_receipts.0,
            version: row.version,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed [`MessageStore`].
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Create a new message repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM messages WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check message", e))
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn create(&self, message: &Message) -> AppResult<Message> {
        sqlx::query_as::<_, MessageRow>(
            "INSERT INTO messages (id, title, body, target, read_receipts, version, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(message.id)
        .bind(&message.title)
        .bind(&message.body)
        .bind(&message.target)
        .bind(Json(&message.read_receipts))
        .bind(message.version)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map(Message::from)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create message", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, MessageRow>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Message::from))
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find message", e))
    }

    async fn find_recent(&self, limit: u32) -> AppResult<Vec<Message>> {
        sqlx::query_as::<_, MessageRow>("SELECT * FROM messages ORDER BY created_at DESC LIMIT $1")
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map(|rows| rows.into_iter().map(Message::from).collect())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list messages", e))
    }

    async fn replace_receipts(
        &self,
        id: Uuid,
        expected_version: i64,
        receipts: &[ReadReceipt],
    ) -> AppResult<ReceiptWrite> {
        let updated = sqlx::query_as::<_, MessageRow>(
            "UPDATE messages SET read_receipts = $3, version = version + 1 \
             WHERE id = $1 AND version = $2 RETURNING *",
        )
        .bind(id)
        .bind(expected_version)
        .bind(Json(receipts))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update receipts", e))?;

        match updated {
            Some(row) => Ok(ReceiptWrite::Updated(row.into())),
            None if self.exists(id).await? => Ok(ReceiptWrite::Conflict),
            None => Ok(ReceiptWrite::Missing),
        }
    }
}
