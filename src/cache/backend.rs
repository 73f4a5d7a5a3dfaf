//! Cache backend implementations.

use super::clock::{Clock, SystemClock};
use super::key::CacheKey;
use crate::Result;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Clone)]
struct CacheEntry {
    data: Vec<u8>,
    stored_at: SystemTime,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: SystemTime) -> bool {
        is_expired(self.stored_at, self.ttl, now)
    }
}

/// An entry is servable strictly before `stored_at + ttl`.
pub(crate) fn is_expired(stored_at: SystemTime, ttl: Duration, now: SystemTime) -> bool {
    match now.duration_since(stored_at) {
        Ok(age) => age >= ttl,
        // Clock went backwards; keep the entry rather than thrash the store.
        Err(_) => false,
    }
}

#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<()>;
    async fn delete(&self, key: &CacheKey) -> Result<bool>;
    async fn exists(&self, key: &CacheKey) -> Result<bool>;
    async fn clear(&self) -> Result<()>;
    async fn len(&self) -> Result<usize>;
    fn name(&self) -> &'static str;
}

/// Bounded in-process LRU store.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            clock,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let expired = match entries.get(&key.hash) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.data.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(&key.hash);
        }
        Ok(None)
    }
    async fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<()> {
        let entry = CacheEntry {
            data: value.to_vec(),
            stored_at: self.clock.now(),
            ttl,
        };
        self.lock().put(key.hash.clone(), entry);
        Ok(())
    }
    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.lock().pop(&key.hash).is_some())
    }
    async fn exists(&self, key: &CacheKey) -> Result<bool> {
        let now = self.clock.now();
        Ok(self
            .lock()
            .peek(&key.hash)
            .map(|e| !e.is_expired(now))
            .unwrap_or(false))
    }
    async fn clear(&self) -> Result<()> {
        self.lock().clear();
        Ok(())
    }
    async fn len(&self) -> Result<usize> {
        let now = self.clock.now();
        Ok(self
            .lock()
            .iter()
            .filter(|(_, e)| !e.is_expired(now))
            .count())
    }
    fn name(&self) -> &'static str {
        "memory"
    }
}

pub struct NullCache;
impl NullCache {
    pub fn new() -> Self {
        Self
    }
}
impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn get(&self, _: &CacheKey) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
    async fn set(&self, _: &CacheKey, _: &[u8], _: Duration) -> Result<()> {
        Ok(())
    }
    async fn delete(&self, _: &CacheKey) -> Result<bool> {
        Ok(false)
    }
    async fn exists(&self, _: &CacheKey) -> Result<bool> {
        Ok(false)
    }
    async fn clear(&self) -> Result<()> {
        Ok(())
    }
    async fn len(&self) -> Result<usize> {
        Ok(0)
    }
    fn name(&self) -> &'static str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn test_memory_cache_roundtrip_and_delete() {
        tokio_test::block_on(async {
            let cache = MemoryCache::new(10);
            let key = CacheKey::new("k");
            assert_eq!(cache.get(&key).await.unwrap(), None);
            cache.set(&key, b"payload", DAY).await.unwrap();
            assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some(&b"payload"[..]));
            assert!(cache.exists(&key).await.unwrap());
            assert!(cache.delete(&key).await.unwrap());
            assert!(!cache.delete(&key).await.unwrap());
        });
    }

    #[test]
    fn test_memory_cache_expiry() {
        tokio_test::block_on(async {
            let clock = Arc::new(ManualClock::default());
            let cache = MemoryCache::with_clock(10, clock.clone());
            let key = CacheKey::new("k");
            cache.set(&key, b"v", DAY).await.unwrap();

            clock.advance(Duration::from_secs(23 * 3600));
            assert!(cache.get(&key).await.unwrap().is_some());

            clock.advance(Duration::from_secs(2 * 3600));
            assert!(cache.get(&key).await.unwrap().is_none());
            assert_eq!(cache.len().await.unwrap(), 0);
        });
    }

    #[test]
    fn test_memory_cache_evicts_least_recently_used() {
        tokio_test::block_on(async {
            let cache = MemoryCache::new(2);
            let (a, b, c) = (CacheKey::new("a"), CacheKey::new("b"), CacheKey::new("c"));
            cache.set(&a, b"1", DAY).await.unwrap();
            cache.set(&b, b"2", DAY).await.unwrap();
            // Touch `a` so `b` becomes the eviction candidate.
            cache.get(&a).await.unwrap();
            cache.set(&c, b"3", DAY).await.unwrap();
            assert!(cache.exists(&a).await.unwrap());
            assert!(!cache.exists(&b).await.unwrap());
            assert!(cache.exists(&c).await.unwrap());
            assert_eq!(cache.len().await.unwrap(), 2);
        });
    }

    #[test]
    fn test_null_cache_stores_nothing() {
        tokio_test::block_on(async {
            let cache = NullCache::new();
            let key = CacheKey::new("k");
            cache.set(&key, b"v", DAY).await.unwrap();
            assert_eq!(cache.get(&key).await.unwrap(), None);
            assert_eq!(cache.len().await.unwrap(), 0);
            assert_eq!(cache.name(), "null");
        });
    }

    #[test]
    fn test_is_expired_boundaries() {
        let t = SystemTime::UNIX_EPOCH + DAY;
        assert!(!is_expired(t, DAY, t));
        assert!(!is_expired(t, DAY, t + DAY - Duration::from_secs(1)));
        assert!(is_expired(t, DAY, t + DAY));
        assert!(!is_expired(t, DAY, t - Duration::from_secs(5)));
    }
}
