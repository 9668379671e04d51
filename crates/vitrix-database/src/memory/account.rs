//! In-memory account store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use vitrix_core::AppError;
use vitrix_core::result::AppResult;
use vitrix_entity::account::{Account, DeviceToken};

use crate::store::AccountStore;

/// [`AccountStore`] over insertion-ordered vectors.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
    tokens: RwLock<Vec<DeviceToken>>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.has_email(email)).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_group(&self, group: &str) -> AppResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .filter(|a| a.is_member_of(group))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Account>> {
        Ok(self.accounts.read().await.clone())
    }

    async fn active_tokens(&self, account_ids: &[Uuid]) -> AppResult<Vec<DeviceToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .filter(|t| t.active && account_ids.contains(&t.account_id))
            .cloned()
            .collect())
    }

    async fn find_token(&self, token: &str) -> AppResult<Option<DeviceToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn deactivate_token(&self, token: &str) -> AppResult<bool> {
        let mut tokens = self.tokens.write().await;
        match tokens.iter_mut().find(|t| t.token == token && t.active) {
            Some(entry) => {
                entry.active = false;
                entry.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_account(&self, account: &Account) -> AppResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.has_email(&account.email)) {
            return Err(AppError::conflict(format!(
                "An account with email '{}' already exists",
                account.email
            )));
        }
        accounts.push(account.clone());
        Ok(account.clone())
    }

    async fn register_token(&self, token: &DeviceToken) -> AppResult<DeviceToken> {
        let mut tokens = self.tokens.write().await;
        if let Some(existing) = tokens.iter_mut().find(|t| t.token == token.token) {
            existing.account_id = token.account_id;
            existing.platform = token.platform.clone();
            existing.active = true;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        let mut stored = token.clone();
        stored.active = true;
        tokens.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrix_entity::account::UserRole;

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let store = MemoryAccountStore::new();
        let account = Account::new("Ana@Gym.io", None, UserRole::Trainee);
        store.create_account(&account).await.unwrap();

        let found = store.find_by_email("ana@gym.io").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(account.id));

        let dup = Account::new("ANA@gym.io", None, UserRole::Trainee);
        assert!(store.create_account(&dup).await.is_err());
    }

    #[tokio::test]
    async fn deactivation_hides_token_from_active_set() {
        let store = MemoryAccountStore::new();
        let account = Account::new("a@gym.io", None, UserRole::Trainee);
        store.create_account(&account).await.unwrap();
        store
            .register_token(&DeviceToken::new(account.id, "t1"))
            .await
            .unwrap();
        store
            .register_token(&DeviceToken::new(account.id, "t2"))
            .await
            .unwrap();

        assert!(store.deactivate_token("t1").await.unwrap());
        assert!(!store.deactivate_token("t1").await.unwrap());
        assert!(!store.deactivate_token("nope").await.unwrap());

        let active = store.active_tokens(&[account.id]).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].token, "t2");
        assert!(!store.find_token("t1").await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn re_registering_reactivates() {
        let store = MemoryAccountStore::new();
        let id = Uuid::new_v4();
        store
            .register_token(&DeviceToken::new(id, "t1").inactive())
            .await
            .unwrap();
        store.deactivate_token("t1").await.unwrap();
        let token = store
            .register_token(&DeviceToken::new(id, "t1"))
            .await
            .unwrap();
        assert!(token.active);
    }
}
