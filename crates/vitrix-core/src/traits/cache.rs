//! Key/value cache seam.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// String key/value store whose entries expire individually.
///
/// Misses and expiries look the same to callers: both read as `None`.
#[async_trait]
pub trait CacheProvider: Send + Sync + Debug + 'static {
    /// Value stored under `key`, if present and not yet expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key` for at most `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;
}
