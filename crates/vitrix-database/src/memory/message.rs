//! In-memory message store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use vitrix_core::AppError;
use vitrix_core::result::AppResult;
use vitrix_entity::message::{Message, ReadReceipt};

use crate::store::{MessageStore, ReceiptWrite};

/// [`MessageStore`] over a map keyed by message id.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    messages: RwLock<HashMap<Uuid, Message>>,
}

impl MemoryMessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn create(&self, message: &Message) -> AppResult<Message> {
        let mut messages = self.messages.write().await;
        if messages.contains_key(&message.id) {
            return Err(AppError::conflict(format!(
                "Message '{}' already exists",
                message.id
            )));
        }
        messages.insert(message.id, message.clone());
        Ok(message.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Message>> {
        Ok(self.messages.read().await.get(&id).cloned())
    }

    async fn find_recent(&self, limit: u32) -> AppResult<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut recent: Vec<Message> = messages.values().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit as usize);
        Ok(recent)
    }

    async fn replace_receipts(
        &self,
        id: Uuid,
        expected_version: i64,
        receipts: &[ReadReceipt],
    ) -> AppResult<ReceiptWrite> {
        let mut messages = self.messages.write().await;
        let Some(message) = messages.get_mut(&id) else {
            return Ok(ReceiptWrite::Missing);
        };
        if message.version != expected_version {
            return Ok(ReceiptWrite::Conflict);
        }
        message.read_receipts = receipts.to_vec();
        message.version += 1;
        Ok(ReceiptWrite::Updated(message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrix_entity::notification::Target;

    #[tokio::test]
    async fn versioned_write_detects_conflicts() {
        let store = MemoryMessageStore::new();
        let message = Message::new("t", "b", &Target::All, Vec::new());
        store.create(&message).await.unwrap();

        let receipts = vec![ReadReceipt::unread(Some("a@gym.io".into()), None, "A")];
        let first = store.replace_receipts(message.id, 0, &receipts).await.unwrap();
        match first {
            ReceiptWrite::Updated(m) => {
                assert_eq!(m.version, 1);
                assert_eq!(m.read_receipts.len(), 1);
            }
            other => panic!("expected update, got {other:?}"),
        }

        let stale = store.replace_receipts(message.id, 0, &[]).await.unwrap();
        assert_eq!(stale, ReceiptWrite::Conflict);

        let missing = store
            .replace_receipts(Uuid::new_v4(), 0, &[])
            .await
            .unwrap();
        assert_eq!(missing, ReceiptWrite::Missing);
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let store = MemoryMessageStore::new();
        let mut ids = Vec::new();
        for i in 0..3 {
            let mut message = Message::new(format!("t{i}"), "b", &Target::All, Vec::new());
            message.created_at = message.created_at + chrono::Duration::seconds(i);
            ids.push(message.id);
            store.create(&message).await.unwrap();
        }
        let recent = store.find_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, ids[2]);
        assert_eq!(recent[1].id, ids[1]);
    }
}
