use crate::{Cache, CoreError};
use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use std::time::Duration;

/// In-memory implementation of the Cache port using Moka.
/// Holds the bearer tokens accepted by the API in single-executable mode.
#[derive(Clone, Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, Vec<u8>>,
}

impl InMemoryCache {
    /// Creates a new InMemoryCache with specific capacity and default TTL settings.
    pub fn new(max_capacity: u64, default_ttl_seconds: u64) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(default_ttl_seconds))
            .build();
        Self { cache }
    }
}

impl Default for InMemoryCache {
    /// Capacity of 10,000 entries, one hour TTL.
    fn default() -> Self {
        Self::new(10_000, 3600)
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), CoreError> {
        // Entries expire after the TTL configured at build time.
        self.cache.insert(key.to_string(), value.to_vec()).await;
        Ok(())
    }
}
