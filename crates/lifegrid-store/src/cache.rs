//! Shared cache trait, the in-memory TTL cache, and the LRU front tier.
//!
//! The cache is advisory: a cold or broken cache changes latency, never
//! answers. Values are opaque JSON strings; the repository owns the key
//! schema (`board:{id}:current`, `board:{id}:generation:{G}`).

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreResult;

/// Shared cache for serialised board state.
#[async_trait]
pub trait SharedCache: Send + Sync {
    /// Look up a value; `None` on miss or expiry.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store a value with a time-to-live.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> StoreResult<()>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// In-memory shared cache with opportunistic TTL expiry.
///
/// Expired entries are dropped on read; there is no background sweeper.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held (expired entries included until
    /// their next read).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SharedCache for MemoryCache {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = Instant::now();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
            }
        }

        // Entry exists but expired: drop it under the write lock.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
            debug!(key, "cache_entry_expired");
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> StoreResult<()> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }
}

/// Per-process LRU tier layered in front of a shared cache.
///
/// Strictly a read-through optimisation: every miss falls through to the
/// inner cache and every hit there repopulates the LRU. Board records are
/// write-once and generation caches are deterministic, so the tier never
/// needs invalidation.
pub struct LruTier {
    inner: Arc<dyn SharedCache>,
    recent: Mutex<LruCache<String, String>>,
}

impl LruTier {
    /// Wrap a shared cache with an LRU of the given capacity.
    pub fn new(inner: Arc<dyn SharedCache>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity clamped to >= 1");
        Self {
            inner,
            recent: Mutex::new(LruCache::new(capacity)),
        }
    }
}

#[async_trait]
impl SharedCache for LruTier {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if let Some(value) = self
            .recent
            .lock()
            .expect("lru tier lock poisoned")
            .get(key)
            .cloned()
        {
            return Ok(Some(value));
        }

        let value = self.inner.get(key).await?;
        if let Some(value) = &value {
            self.recent
                .lock()
                .expect("lru tier lock poisoned")
                .put(key.to_string(), value.clone());
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> StoreResult<()> {
        self.recent
            .lock()
            .expect("lru tier lock poisoned")
            .put(key.to_string(), value.clone());
        self.inner.set(key, value, ttl).await
    }
}
