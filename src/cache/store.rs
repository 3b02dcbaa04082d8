//! Main Cache Module
//!
//! Thread-safe, lazily allocated wrapper around the LRU engine.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{ByteLru, ByteView, GroupStats, OnEvicted};

// == Main Cache ==
/// Local cache of one group.
///
/// Every operation holds the lock for its whole duration. The engine is only
/// allocated by the first `add`, so an idle group costs nothing.
#[derive(Debug)]
pub struct MainCache {
    /// Lazily allocated engine
    lru: Mutex<Option<ByteLru<ByteView>>>,
    /// Byte budget handed to the engine, 0 = unlimited
    cache_bytes: usize,
    /// Receives eviction counts once the engine exists
    stats: Option<Arc<GroupStats>>,
}

impl MainCache {
    // == Constructor ==
    /// Creates an unallocated cache bounded to `cache_bytes`.
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            lru: Mutex::new(None),
            cache_bytes,
            stats: None,
        }
    }

    /// Same as [`MainCache::new`], counting evictions into `stats`.
    pub fn with_stats(cache_bytes: usize, stats: Arc<GroupStats>) -> Self {
        Self {
            lru: Mutex::new(None),
            cache_bytes,
            stats: Some(stats),
        }
    }

    // == Add ==
    /// Stores `value` under `key`, allocating the engine on first use.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut guard = self.lru.lock();
        let lru = guard.get_or_insert_with(|| {
            let on_evicted = self.stats.clone().map(|stats| -> OnEvicted<ByteView> {
                Box::new(move |_, _| stats.record_eviction())
            });
            ByteLru::new(self.cache_bytes, on_evicted)
        });
        lru.add(key, value);
    }

    // == Get ==
    /// Looks up `key`. An unallocated cache is a miss.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.lru.lock();
        guard.as_mut()?.get(key).cloned()
    }

    // == Length ==
    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lru.lock().as_ref().map_or(0, ByteLru::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes held by cached entries.
    pub fn used_bytes(&self) -> usize {
        self.lru.lock().as_ref().map_or(0, ByteLru::used_bytes)
    }

    /// Whether the engine has been allocated yet.
    pub fn is_initialized(&self) -> bool {
        self.lru.lock().is_some()
    }
}
