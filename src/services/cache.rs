//! TTL cache over the persistent key-value table.
//!
//! Values are stored as a JSON envelope `{ value, timestamp }`. Expired
//! entries are deleted when read. Storage failures and corrupt envelopes are
//! logged and behave like a miss, so callers always fall back to fetching.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::Store;

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    #[must_use]
    pub const fn at(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    pub fn advance(&self, by: Duration) {
        let by = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    /// Epoch millis of the write.
    pub timestamp: i64,
}

#[derive(Clone)]
pub struct TtlCache {
    store: Store,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    #[must_use]
    pub fn new(store: Store, ttl: Duration) -> Self {
        Self::with_clock(store, ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(store: Store, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            clock,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = match self.store.get_cache_payload(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                record_miss();
                return None;
            }
            Err(e) => {
                warn!(key, "Cache read failed: {e:#}");
                record_miss();
                return None;
            }
        };

        let Ok(entry) = serde_json::from_str::<CacheEntry<serde_json::Value>>(&payload) else {
            debug!(key, "Ignoring corrupt cache entry");
            record_miss();
            return None;
        };

        if self.clock.now_millis() - entry.timestamp > self.ttl_millis {
            debug!(key, "Cache entry expired");
            if let Err(e) = self.store.remove_cache_payload(key).await {
                warn!(key, "Failed to evict expired cache entry: {e:#}");
            }
            record_miss();
            return None;
        }

        if let Ok(value) = serde_json::from_value(entry.value) {
            debug!(key, "Cache hit");
            metrics::counter!("cache_hits_total").increment(1);
            Some(value)
        } else {
            debug!(key, "Cached value has an unexpected shape");
            record_miss();
            None
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        let entry = CacheEntry {
            value,
            timestamp: self.clock.now_millis(),
        };

        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, "Failed to encode cache entry: {e}");
                return;
            }
        };

        if let Err(e) = self.store.put_cache_payload(key, payload).await {
            warn!(key, "Cache write failed: {e:#}");
        }
    }

    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove_cache_payload(key).await {
            warn!(key, "Cache remove failed: {e:#}");
        }
    }
}

fn record_miss() {
    metrics::counter!("cache_misses_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn cache_with_clock(ttl: Duration) -> (TtlCache, Arc<ManualClock>, Store) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let clock = Arc::new(ManualClock::at(1_000_000));
        let cache = TtlCache::with_clock(store.clone(), ttl, clock.clone());
        (cache, clock, store)
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (cache, _, _) = cache_with_clock(Duration::from_secs(3600)).await;

        cache.set("manga_sheet_data", &vec![1, 2, 3]).await;
        let value: Option<Vec<i32>> = cache.get("manga_sheet_data").await;
        assert_eq!(value, Some(vec![1, 2, 3]));

        cache.set("manga_sheet_data", &vec![4]).await;
        let value: Option<Vec<i32>> = cache.get("manga_sheet_data").await;
        assert_eq!(value, Some(vec![4]));
    }

    #[tokio::test]
    async fn test_expired_entry_is_removed() {
        let (cache, clock, store) = cache_with_clock(Duration::from_secs(3600)).await;

        cache.set("k", &"v").await;
        clock.advance(Duration::from_secs(3600));
        assert_eq!(cache.get::<String>("k").await.as_deref(), Some("v"));

        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get::<String>("k").await, None);
        assert_eq!(store.get_cache_payload("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let (cache, _, store) = cache_with_clock(Duration::from_secs(60)).await;

        store
            .put_cache_payload("k", "{not json".to_string())
            .await
            .unwrap();
        assert_eq!(cache.get::<String>("k").await, None);

        cache.set("n", &42).await;
        assert_eq!(cache.get::<String>("n").await, None);
    }

    #[tokio::test]
    async fn test_remove() {
        let (cache, _, _) = cache_with_clock(Duration::from_secs(60)).await;
        cache.set("k", &true).await;
        cache.remove("k").await;
        assert_eq!(cache.get::<bool>("k").await, None);
    }
}
