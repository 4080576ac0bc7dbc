//! In-memory cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Cache;

/// Process-local TTL cache.
///
/// Expiry is lazy: a stale entry reads as a miss and is physically removed
/// on the next write pass.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (serde_json::Value, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries. Test/introspection helper.
    pub async fn live_len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|(_, expires)| *expires > now)
            .count()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        let (value, expires) = entries.get(key)?;
        if *expires <= Instant::now() {
            return None;
        }
        Some(value.clone())
    }

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(key.to_string(), (value, now + ttl));
    }

    async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    async fn remove_by_prefix(&self, prefix: &str) {
        self.entries
            .write()
            .await
            .retain(|key, _| !key.starts_with(prefix));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_key;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = MemoryCache::new();
        cache
            .set("finance.bank_1", serde_json::json!({"code": "AWB"}), Duration::from_secs(60))
            .await;
        let hit = cache.get("finance.bank_1").await.unwrap();
        assert_eq!(hit["code"], "AWB");
    }

    #[tokio::test]
    async fn expired_entries_read_as_misses() {
        let cache = MemoryCache::new();
        cache
            .set("k", serde_json::json!(1), Duration::from_secs(0))
            .await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn remove_by_prefix_drops_only_matching_keys() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set(&entry_key("geography.city", "a"), serde_json::json!(1), ttl).await;
        cache.set(&entry_key("geography.city", "b"), serde_json::json!(2), ttl).await;
        cache.set(&entry_key("finance.bank", "c"), serde_json::json!(3), ttl).await;

        cache.remove_by_prefix("geography.city").await;

        assert!(cache.get("geography.city_a").await.is_none());
        assert!(cache.get("geography.city_b").await.is_none());
        assert!(cache.get("finance.bank_c").await.is_some());
    }
}
