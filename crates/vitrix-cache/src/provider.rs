//! Process-wide cache handle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use vitrix_core::config::CacheConfig;
use vitrix_core::result::AppResult;
use vitrix_core::traits::cache::CacheProvider;

use crate::memory::MemoryCacheProvider;

/// Cloneable handle shared by everything that caches lookups.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Build the in-memory backend described by `config`.
    pub fn new(config: &CacheConfig) -> Self {
        info!(
            max_capacity = config.memory.max_capacity,
            ttl_cap_seconds = config.memory.time_to_live_seconds,
            "In-memory cache ready"
        );
        Self {
            inner: Arc::new(MemoryCacheProvider::new(&config.memory)),
        }
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_entries() {
        let cache = CacheManager::new(&CacheConfig::default());
        let other = cache.clone();
        cache
            .set("vitrix:account:name:ana@gym.io", "Ana", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            other.get("vitrix:account:name:ana@gym.io").await.unwrap(),
            Some("Ana".to_string())
        );
    }
}
