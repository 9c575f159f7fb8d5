//! Response cache keyed by request URL
//!
//! Entries expire a fixed TTL after they were stored. Expired entries are
//! never returned; moka drops them lazily during later reads and writes, so
//! there is no background sweep. The cache has no capacity bound: keys are
//! derived from a small set of filter combinations.

use moka::sync::Cache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Time-to-live for cached responses (2 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60);

/// Session-scoped cache of previously retrieved response bodies
///
/// Cloning is cheap and shares the underlying storage, so one cache can be
/// handed to every consumer of a session.
#[derive(Clone)]
pub struct FetchCache {
    entries: Cache<String, Arc<Value>>,
    ttl: Duration,
}

impl FetchCache {
    /// Create a cache with the default 2-minute TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL applied to every key
    pub fn with_ttl(ttl: Duration) -> Self {
        let entries = Cache::builder().time_to_live(ttl).build();
        Self { entries, ttl }
    }

    /// Payload stored under `key`, or None when absent or expired
    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        let hit = self.entries.get(key);
        debug!(key, hit = hit.is_some(), "fetch cache lookup");
        hit
    }

    /// Store `payload` under `key`, replacing any entry and resetting its age
    pub fn set(&self, key: impl Into<String>, payload: Value) -> Arc<Value> {
        let payload = Arc::new(payload);
        self.entries.insert(key.into(), Arc::clone(&payload));
        payload
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Approximate number of live entries
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_then_get_returns_payload() {
        let cache = FetchCache::new();
        cache.set("http://api/metrics?period=30", json!({"pedidos": 42}));

        let hit = cache.get("http://api/metrics?period=30").unwrap();
        assert_eq!(hit["pedidos"], 42);
    }

    #[test]
    fn test_unset_key_is_none() {
        let cache = FetchCache::new();
        assert!(cache.get("never-set").is_none());
    }

    #[test]
    fn test_set_overwrites_existing_entry() {
        let cache = FetchCache::new();
        cache.set("k", json!(1));
        cache.set("k", json!(2));
        assert_eq!(*cache.get("k").unwrap(), json!(2));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = FetchCache::with_ttl(Duration::from_millis(50));
        cache.set("k", json!([1, 2, 3]));
        assert!(cache.get("k").is_some());

        std::thread::sleep(Duration::from_millis(120));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_set_resets_age() {
        let cache = FetchCache::with_ttl(Duration::from_millis(150));
        cache.set("k", json!("old"));
        std::thread::sleep(Duration::from_millis(100));
        cache.set("k", json!("new"));
        std::thread::sleep(Duration::from_millis(100));

        // 200ms after the first set, but only 100ms after the second
        assert_eq!(*cache.get("k").unwrap(), json!("new"));
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = FetchCache::new();
        cache.set("a", json!(1));
        cache.set("b", json!(2));
        cache.clear();
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = FetchCache::new();
        let other = cache.clone();
        cache.set("shared", json!(true));
        assert!(other.get("shared").is_some());
        assert_eq!(other.ttl(), DEFAULT_TTL);
    }
}
