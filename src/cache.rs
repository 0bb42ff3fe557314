//! Explicit per-operation result cache.
//!
//! Each operation class (search, feed, taxonomy) gets its own store with
//! its own freshness window: a bounded LRU map from an argument hash to
//! `(result, insertion time)`. Reads return a clone only while the entry
//! is fresh; stale entries are dropped on access and replaced by the next
//! fetch. Nothing here touches the network — the aggregation layer decides
//! when a miss triggers a fetch.
use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Freshness window for aggregated search results.
pub const SEARCH_TTL: Duration = Duration::from_secs(30);
/// Freshness window for preference-driven feed results.
pub const FEED_TTL: Duration = Duration::from_secs(10 * 60);
/// Freshness window for taxonomy listings, which change rarely.
pub const TAXONOMY_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Entries kept per operation class before LRU eviction.
const DEFAULT_CAPACITY: usize = 64;

struct Entry<T> {
    value: T,
    inserted_at: Instant,
}

/// Bounded TTL cache for one operation class.
pub struct TtlCache<T> {
    entries: Mutex<LruCache<String, Entry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, ttl)
    }

    pub fn with_capacity(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Look up a fresh entry. Stale entries are evicted, not returned.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let fresh = match entries.get(key) {
            Some(entry) => entry.inserted_at.elapsed() < self.ttl,
            None => return None,
        };

        if fresh {
            entries.get(key).map(|e| e.value.clone())
        } else {
            entries.pop(key);
            None
        }
    }

    /// Store a result, replacing any previous entry for the key.
    pub fn insert(&self, key: String, value: T) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.put(key, Entry { value, inserted_at: Instant::now() });
    }
}

/// Build a cache key from an operation name and its arguments.
///
/// The arguments are serialized canonically and hashed, so equal argument
/// values always map to the same key and distinct values virtually never
/// collide.
pub fn cache_key<A: Serialize>(operation: &str, args: &A) -> String {
    let payload = serde_json::to_string(args).unwrap_or_default();
    let hash = Sha256::digest(format!("{operation}|{payload}").as_bytes());
    format!("{hash:x}")
}
