//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and tag-based invalidation.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded cache storage with LRU eviction, TTL and tags.
///
/// The store is payload-agnostic: `V` is cloned out on hits and never
/// inspected. It is not synchronized; wrap it in a lock to share it.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(max_entries),
            max_entries,
        }
    }

    // == Set ==
    /// Stores a value under `key` for `ttl_seconds`, attached to `tags`.
    ///
    /// Expired entries are swept first. If the key is new and the store is
    /// full, the least recently accessed entry is evicted. Overwriting
    /// replaces value, expiry and tags. A TTL of zero stores an entry that
    /// is already expired on the next lookup.
    pub fn set<S: AsRef<str>>(
        &mut self,
        key: impl Into<String>,
        value: V,
        ttl_seconds: u64,
        tags: &[S],
    ) -> Result<()> {
        let key = key.into();

        if key.is_empty() {
            return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        self.cleanup_expired();

        let previous = self.entries.get(&key).map(|e| e.last_access_sequence);

        if previous.is_none() && self.entries.len() >= self.max_entries {
            self.evict_one();
        }

        let sequence = self.lru.touch(&key, previous);
        let tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self.entries
            .insert(key, CacheEntry::new(value, ttl_seconds, tags, sequence));

        self.stats.set_size(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// `None` is the miss signal. Expired entries are removed and counted as
    /// misses. A hit makes the entry the most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_if(key, |_| true)
    }

    /// Like [`get`](Self::get), but a live value rejected by `accept` is a miss.
    ///
    /// A rejected entry stays cached and keeps its LRU position.
    pub fn get_if<F>(&mut self, key: &str, accept: F) -> Option<V>
    where
        F: FnOnce(&V) -> bool,
    {
        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired() {
            let sequence = entry.last_access_sequence;
            self.entries.remove(key);
            self.lru.remove(sequence);
            self.stats.set_size(self.entries.len());
            self.stats.record_miss();
            return None;
        }

        if !accept(&entry.value) {
            self.stats.record_miss();
            return None;
        }

        entry.last_access_sequence = self.lru.touch(key, Some(entry.last_access_sequence));
        self.stats.record_hit();
        Some(entry.value.clone())
    }

    // == Contains ==
    /// Returns true if a live entry exists, without touching LRU order or stats.
    #[cfg(test)]
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|e| !e.is_expired())
    }

    // == Invalidate ==
    /// Removes every entry carrying at least one of `tags`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate<S: AsRef<str>>(&mut self, tags: &[S]) -> usize {
        if tags.is_empty() {
            return 0;
        }

        let doomed: Vec<(String, u64)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.has_any_tag(tags))
            .map(|(key, entry)| (key.clone(), entry.last_access_sequence))
            .collect();

        let count = self.remove_all(doomed);
        self.stats.record_invalidations(count);
        count
    }

    // == Clear ==
    /// Removes all entries unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_size(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<(String, u64)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, entry)| (key.clone(), entry.last_access_sequence))
            .collect();

        self.remove_all(expired)
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn evict_one(&mut self) {
        if let Some(victim) = self.lru.evict_oldest() {
            debug!(key = %victim, "evicting least recently used entry");
            self.entries.remove(&victim);
            self.stats.record_eviction();
        }
    }

    fn remove_all(&mut self, doomed: Vec<(String, u64)>) -> usize {
        let count = doomed.len();
        for (key, sequence) in doomed {
            self.entries.remove(&key);
            self.lru.remove(sequence);
        }
        self.stats.set_size(self.entries.len());
        count
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    const NO_TAGS: &[&str] = &[];

    fn keys(store: &CacheStore<i32>) -> Vec<String> {
        let mut keys: Vec<String> = store.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<i32> = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_entries(), 100);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100);

        store.set("key1", "value1".to_string(), 60, NO_TAGS).unwrap();

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent_is_miss() {
        let mut store: CacheStore<i32> = CacheStore::new(100);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_cached_none_is_a_hit() {
        let mut store: CacheStore<Option<i32>> = CacheStore::new(10);

        store.set("nothing", None, 60, NO_TAGS).unwrap();

        assert_eq!(store.get("nothing"), Some(None));
        assert_eq!(store.get("absent"), None);
    }

    #[test]
    fn test_rejected_value_is_a_miss() {
        let mut store = CacheStore::new(2);
        store.set("a", 1, 60, NO_TAGS).unwrap();
        store.set("b", 2, 60, NO_TAGS).unwrap();

        assert_eq!(store.get_if("a", |v| *v > 5), None);
        assert_eq!(store.stats().hits, 0);
        assert_eq!(store.stats().misses, 1);

        // Rejection does not refresh recency, so "a" is still the LRU victim
        store.set("c", 3, 60, NO_TAGS).unwrap();
        assert!(!store.contains("a"));
        assert_eq!(store.get_if("b", |v| *v == 2), Some(2));
        assert_eq!(store.stats().hits, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100);

        store.set("key1", 1, 60, &["a"]).unwrap();
        store.set("key1", 2, 60, &["b"]).unwrap();

        assert_eq!(store.get("key1"), Some(2));
        assert_eq!(store.len(), 1);

        // Tags are replaced along with the value
        assert_eq!(store.invalidate(&["a"]), 0);
        assert_eq!(store.invalidate(&["b"]), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100);

        store.set("key1", 1, 1, NO_TAGS).unwrap();
        assert_eq!(store.get("key1"), Some(1));

        sleep(Duration::from_millis(1100));

        assert_eq!(store.get("key1"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut store = CacheStore::new(10);

        store.set("key1", 1, 0, NO_TAGS).unwrap();

        assert!(!store.contains("key1"));
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3);

        store.set("key1", 1, 60, NO_TAGS).unwrap();
        store.set("key2", 2, 60, NO_TAGS).unwrap();
        store.set("key3", 3, 60, NO_TAGS).unwrap();
        store.set("key4", 4, 60, NO_TAGS).unwrap();

        assert_eq!(keys(&store), vec!["key2", "key3", "key4"]);
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = CacheStore::new(3);

        store.set("key1", 1, 60, NO_TAGS).unwrap();
        store.set("key2", 2, 60, NO_TAGS).unwrap();
        store.set("key3", 3, 60, NO_TAGS).unwrap();

        store.get("key1").unwrap();
        store.set("key4", 4, 60, NO_TAGS).unwrap();

        assert_eq!(keys(&store), vec!["key1", "key3", "key4"]);
    }

    #[test]
    fn test_capacity_two_scenario() {
        let mut store = CacheStore::new(2);

        store.set("a", 1, 60, NO_TAGS).unwrap();
        store.set("b", 2, 60, NO_TAGS).unwrap();
        store.set("c", 3, 60, NO_TAGS).unwrap();
        assert_eq!(keys(&store), vec!["b", "c"]);

        store.get("b").unwrap();
        store.set("d", 4, 60, NO_TAGS).unwrap();
        assert_eq!(keys(&store), vec!["b", "d"]);
    }

    #[test]
    fn test_expired_entries_go_before_lru_victim() {
        let mut store = CacheStore::new(2);

        store.set("old", 1, 60, NO_TAGS).unwrap();
        store.set("stale", 2, 0, NO_TAGS).unwrap();
        store.set("new", 3, 60, NO_TAGS).unwrap();

        assert_eq!(keys(&store), vec!["new", "old"]);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let mut store = CacheStore::new(2);

        store.set("a", 1, 60, NO_TAGS).unwrap();
        store.set("b", 2, 60, NO_TAGS).unwrap();
        store.set("a", 10, 60, NO_TAGS).unwrap();

        assert_eq!(keys(&store), vec!["a", "b"]);
        // The overwrite counts as an access, so b is now the victim
        store.set("c", 3, 60, NO_TAGS).unwrap();
        assert_eq!(keys(&store), vec!["a", "c"]);
    }

    #[test]
    fn test_invalidate_by_tags() {
        let mut store = CacheStore::new(10);

        store.set("leads:1", 1, 60, &["leads"]).unwrap();
        store.set("leads:2", 2, 60, &["leads", "analytics"]).unwrap();
        store.set("visitors", 3, 60, &["visitors"]).unwrap();
        store.set("untagged", 4, 60, NO_TAGS).unwrap();

        assert_eq!(store.invalidate(&["leads"]), 2);
        assert_eq!(keys(&store), vec!["untagged", "visitors"]);
        assert_eq!(store.stats().invalidations, 2);
    }

    #[test]
    fn test_invalidate_empty_tag_list() {
        let mut store = CacheStore::new(10);
        store.set("a", 1, 60, &["x"]).unwrap();

        assert_eq!(store.invalidate(NO_TAGS), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = CacheStore::new(10);
        store.set("a", 1, 60, &["x"]).unwrap();
        store.set("b", 2, 60, NO_TAGS).unwrap();

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);
        store.set("c", 3, 60, NO_TAGS).unwrap();
        assert_eq!(store.get("c"), Some(3));
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(100);

        store.set("key1", 1, 60, NO_TAGS).unwrap();
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_size, 100);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(100);

        store.set("key1", 1, 1, NO_TAGS).unwrap();
        store.set("key2", 2, 10, NO_TAGS).unwrap();

        sleep(Duration::from_millis(1100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key2"), Some(2));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let mut store = CacheStore::new(100);

        let result = store.set("", 1, 60, NO_TAGS);
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        let result = store.set(long_key, 1, 60, NO_TAGS);
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
        assert!(store.is_empty());
    }
}
