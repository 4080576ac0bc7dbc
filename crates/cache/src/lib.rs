//! `refdata-cache` — read-cache port and in-memory implementation.
//!
//! The cache is a pure performance layer: a miss never changes query
//! results, only their latency. Coherency is the writer's job — handlers
//! refresh the direct `{kind}_{id}` entry after updates and drop every
//! `{kind}`-prefixed entry after any successful write.

pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use memory::MemoryCache;

/// Default entry lifetime for refreshed records.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Keyed JSON cache port.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the live value at `key`, or `None` on miss/expiry.
    async fn get(&self, key: &str) -> Option<serde_json::Value>;

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration);

    async fn remove(&self, key: &str);

    /// Drop every entry whose key starts with `prefix`. Used when a write
    /// can affect many cached query results, not just one record entry.
    async fn remove_by_prefix(&self, prefix: &str);
}

/// The direct-key scheme: one entry per record, `{kind}_{id}`.
pub fn entry_key(kind: &str, id: impl core::fmt::Display) -> String {
    format!("{kind}_{id}")
}

/// Typed read helper. Deserialization failures count as misses.
pub async fn get_typed<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    let value = cache.get(key).await?;
    match serde_json::from_value(value) {
        Ok(typed) => Some(typed),
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding undecodable cache entry");
            cache.remove(key).await;
            None
        }
    }
}

/// Typed write helper. Serialization failures are logged and skipped — the
/// cache must never fail a request.
pub async fn set_typed<T: Serialize>(cache: &dyn Cache, key: &str, value: &T, ttl: Duration) {
    match serde_json::to_value(value) {
        Ok(json) => cache.set(key, json, ttl).await,
        Err(err) => tracing::warn!(key, error = %err, "failed to serialize cache entry"),
    }
}
