//! LRU Engine Module
//!
//! Byte-bounded Least Recently Used store used as the local cache engine.

use std::fmt;

use lru::LruCache;

// == Byte Size ==
/// Values stored in a [`ByteLru`] report how many bytes they occupy.
pub trait ByteSize {
    fn byte_len(&self) -> usize;
}

/// Observer invoked with every entry evicted by capacity pressure.
pub type OnEvicted<V> = Box<dyn FnMut(&str, &V) + Send>;

// == Byte LRU ==
/// Size-accounted LRU store.
///
/// Recency order lives in an unbounded [`LruCache`]:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Capacity is enforced here in bytes (`key.len() + value.byte_len()` per
/// entry) rather than by entry count. A `max_bytes` of zero means unlimited.
///
/// Not synchronized; callers wrap it in a lock.
pub struct ByteLru<V> {
    /// Entries in recency order
    order: LruCache<String, V>,
    /// Capacity in bytes, 0 = unlimited
    max_bytes: usize,
    /// Sum of key and value sizes of resident entries
    used_bytes: usize,
    /// Optional eviction observer
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: ByteSize> ByteLru<V> {
    // == Constructor ==
    /// Creates an empty engine bounded to `max_bytes`.
    ///
    /// # Arguments
    /// * `max_bytes` - Capacity in bytes, 0 disables eviction
    /// * `on_evicted` - Optional observer called for each evicted entry
    pub fn new(max_bytes: usize, on_evicted: Option<OnEvicted<V>>) -> Self {
        Self {
            order: LruCache::unbounded(),
            max_bytes,
            used_bytes: 0,
            on_evicted,
        }
    }

    // == Add ==
    /// Inserts or replaces `key` and marks it most recently used.
    ///
    /// Evicts least recently used entries until the byte budget holds again.
    /// An entry larger than the whole budget is evicted right away.
    pub fn add(&mut self, key: &str, value: V) {
        let new_len = value.byte_len();
        if let Some(existing) = self.order.get_mut(key) {
            let old_len = existing.byte_len();
            *existing = value;
            self.used_bytes = self.used_bytes + new_len - old_len;
        } else {
            self.order.put(key.to_owned(), value);
            self.used_bytes += key.len() + new_len;
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    // == Get ==
    /// Looks up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.order.get(key)
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry and returns it.
    ///
    /// Returns None if the engine is empty.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let (key, value) = self.order.pop_lru()?;
        self.used_bytes -= key.len() + value.byte_len();
        if let Some(callback) = self.on_evicted.as_mut() {
            callback(&key, &value);
        }
        Some((key, value))
    }

    // == Length ==
    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Bytes currently accounted to resident entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Keys from least to most recently used.
    pub fn keys_oldest_first(&self) -> Vec<String> {
        self.order.iter().rev().map(|(k, _)| k.clone()).collect()
    }
}

impl<V> fmt::Debug for ByteLru<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteLru")
            .field("len", &self.order.len())
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}

impl ByteSize for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn value(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_lru_new() {
        let lru: ByteLru<String> = ByteLru::new(0, None);
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_get() {
        let mut lru = ByteLru::new(0, None);
        lru.add("key1", value("1234"));

        assert_eq!(lru.get("key1"), Some(&value("1234")));
        assert_eq!(lru.get("key2"), None);
    }

    #[test]
    fn test_lru_remove_oldest_on_overflow() {
        let (k1, k2, k3) = ("key1", "key2", "k3");
        let (v1, v2, v3) = ("value1", "value2", "v3");
        let cap = k1.len() + k2.len() + v1.len() + v2.len();

        let mut lru = ByteLru::new(cap, None);
        lru.add(k1, value(v1));
        lru.add(k2, value(v2));
        lru.add(k3, value(v3));

        assert!(lru.get("key1").is_none());
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_lru_on_evicted() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();
        let callback: OnEvicted<String> = Box::new(move |key, _| {
            sink.lock().unwrap().push(key.to_string());
        });

        let mut lru = ByteLru::new(10, Some(callback));
        lru.add("key1", value("123456"));
        lru.add("k2", value("k2"));
        lru.add("k3", value("k3"));
        lru.add("k4", value("k4"));

        assert_eq!(*evicted.lock().unwrap(), vec!["key1", "k2"]);
    }

    #[test]
    fn test_lru_overwrite_adjusts_bytes() {
        let mut lru = ByteLru::new(0, None);
        lru.add("key", value("1"));
        lru.add("key", value("111"));

        assert_eq!(lru.used_bytes(), "key".len() + "111".len());
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.get("key"), Some(&value("111")));
    }

    #[test]
    fn test_lru_overwrite_shrinks_bytes() {
        let mut lru = ByteLru::new(0, None);
        lru.add("key", value("12345"));
        lru.add("key", value("1"));

        assert_eq!(lru.used_bytes(), 4);
    }

    #[test]
    fn test_lru_get_moves_to_front() {
        let mut lru = ByteLru::new(0, None);
        lru.add("a", value("1"));
        lru.add("b", value("2"));
        lru.add("c", value("3"));

        lru.get("a");

        assert_eq!(lru.keys_oldest_first(), vec!["b", "c", "a"]);
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("b".to_string()));
    }

    #[test]
    fn test_lru_overwrite_moves_to_front() {
        let mut lru = ByteLru::new(0, None);
        lru.add("a", value("1"));
        lru.add("b", value("2"));
        lru.add("a", value("3"));

        assert_eq!(lru.keys_oldest_first(), vec!["b", "a"]);
    }

    #[test]
    fn test_lru_remove_oldest_empty() {
        let mut lru: ByteLru<String> = ByteLru::new(0, None);
        assert!(lru.remove_oldest().is_none());
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_oversized_entry_is_evicted_immediately() {
        let mut lru = ByteLru::new(8, None);
        lru.add("a", value("1"));
        lru.add("big", value("0123456789"));

        assert!(lru.is_empty());
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_unlimited_never_evicts() {
        let mut lru = ByteLru::new(0, None);
        for i in 0..1000 {
            lru.add(&format!("key{}", i), value("some value"));
        }
        assert_eq!(lru.len(), 1000);
    }

    #[test]
    fn test_lru_remove_oldest_reports_entry() {
        let mut lru = ByteLru::new(0, None);
        lru.add("first", value("1"));
        lru.add("second", value("2"));

        assert_eq!(
            lru.remove_oldest(),
            Some(("first".to_string(), value("1")))
        );
        assert_eq!(lru.used_bytes(), "second".len() + 1);
    }
}
