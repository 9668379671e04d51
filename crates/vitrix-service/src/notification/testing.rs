//! Shared fixtures for notification tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vitrix_core::config::{CacheConfig, NotificationsConfig};
use vitrix_database::AccountStore;
use vitrix_database::memory::{MemoryAccountStore, MemoryMessageStore};
use vitrix_cache::CacheManager;
use vitrix_entity::account::{Account, DeviceToken, UserRole};
use vitrix_push::{PushError, PushGateway, PushMessage};

use super::{
    AccountDirectory, NotificationDispatcher, NotificationService, ReceiptReconciler,
    RecipientResolver,
};

/// Gateway that accepts every token except the scripted failures.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    unconfigured: bool,
    failures: HashMap<String, PushError>,
    sent: Mutex<Vec<PushMessage>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::default()
        }
    }

    pub fn failing(mut self, token: &str, code: &str) -> Self {
        self.failures.insert(
            token.to_string(),
            PushError::Rejected {
                status: 404,
                code: code.to_string(),
                message: format!("{code} for {token}"),
            },
        );
        self
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushGateway for ScriptedGateway {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn send(&self, message: &PushMessage) -> Result<String, PushError> {
        self.sent.lock().unwrap().push(message.clone());
        match self.failures.get(message.token()) {
            Some(err) => Err(err.clone()),
            None => Ok(format!("projects/test/messages/{}", message.token())),
        }
    }
}

/// In-memory stores plus a scripted gateway.
pub struct Fixture {
    pub accounts: Arc<MemoryAccountStore>,
    pub messages: Arc<MemoryMessageStore>,
    pub gateway: Arc<ScriptedGateway>,
    pub cache: CacheManager,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_gateway(ScriptedGateway::new())
    }

    pub fn with_gateway(gateway: ScriptedGateway) -> Self {
        Self {
            accounts: Arc::new(MemoryAccountStore::new()),
            messages: Arc::new(MemoryMessageStore::new()),
            gateway: Arc::new(gateway),
            cache: CacheManager::new(&CacheConfig::default()),
        }
    }

    pub fn directory(&self) -> AccountDirectory {
        AccountDirectory::new(self.accounts.clone(), self.cache.clone(), 600)
    }

    pub fn dispatcher(&self) -> NotificationDispatcher {
        NotificationDispatcher::new(self.gateway.clone(), self.accounts.clone())
    }

    pub fn reconciler(&self) -> ReceiptReconciler {
        ReceiptReconciler::new(self.messages.clone(), self.directory(), 5)
    }

    pub fn service(&self) -> NotificationService {
        NotificationService::new(
            RecipientResolver::new(self.accounts.clone()),
            self.dispatcher(),
            self.reconciler(),
            self.messages.clone(),
            NotificationsConfig::default(),
        )
    }
}

/// Insert an account with the given groups and active tokens.
pub async fn seed(
    fx: &Fixture,
    email: &str,
    role: UserRole,
    groups: &[&str],
    tokens: &[&str],
) -> Account {
    let name = email.split('@').next().unwrap_or(email).to_string();
    let mut account = Account::new(email, Some(name), role);
    for group in groups {
        account = account.in_group(*group);
    }
    fx.accounts.create_account(&account).await.unwrap();
    for token in tokens {
        fx.accounts
            .register_token(&DeviceToken::new(account.id, *token))
            .await
            .unwrap();
    }
    account
}
