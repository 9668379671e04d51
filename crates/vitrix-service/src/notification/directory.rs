//! Cached display-name lookup for read receipts.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use vitrix_cache::CacheManager;
use vitrix_cache::keys;
use vitrix_core::traits::cache::CacheProvider;
use vitrix_database::AccountStore;
use vitrix_entity::account::Account;
use vitrix_entity::message::ReceiptIdentity;

/// Name recorded when an identity cannot be resolved.
pub const UNKNOWN_NAME: &str = "unknown";

/// Resolves receipt identities to display names through the cache.
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    accounts: Arc<dyn AccountStore>,
    cache: CacheManager,
    ttl: Duration,
}

impl AccountDirectory {
    /// Create a directory caching names for `ttl_seconds`.
    pub fn new(accounts: Arc<dyn AccountStore>, cache: CacheManager, ttl_seconds: u64) -> Self {
        Self {
            accounts,
            cache,
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Display name for an identity, or [`UNKNOWN_NAME`].
    ///
    /// Never fails: store and cache errors are logged and fall back.
    pub async fn display_name(&self, identity: &ReceiptIdentity) -> String {
        let key = keys::account_name(identity.key());

        match self.cache.get(&key).await {
            Ok(Some(name)) => return name,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Directory cache read failed"),
        }

        let Some(name) = self.lookup(identity).await else {
            return UNKNOWN_NAME.to_string();
        };

        if let Err(e) = self.cache.set(&key, &name, self.ttl).await {
            warn!(error = %e, "Directory cache write failed");
        }
        name
    }

    async fn lookup(&self, identity: &ReceiptIdentity) -> Option<String> {
        let found = match (&identity.email, &identity.user_id) {
            (Some(email), _) => self.accounts.find_by_email(email).await,
            (None, Some(user_id)) => match Uuid::parse_str(user_id) {
                Ok(id) => self.accounts.find_by_id(id).await,
                Err(_) => {
                    debug!(user_id = %user_id, "User id is not a UUID; skipping lookup");
                    Ok(None)
                }
            },
            (None, None) => Ok(None),
        };

        match found {
            Ok(account) => account.map(|a| name_of(&a)),
            Err(e) => {
                warn!(identity = identity.key(), error = %e, "Directory lookup failed");
                None
            }
        }
    }
}

/// Display name of an account, falling back to its email.
pub fn name_of(account: &Account) -> String {
    account
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(&account.email)
        .to_string()
}
