//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction using a
//! monotonically increasing access sequence.

use std::collections::BTreeMap;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch hands out the next value of a global counter. Keys are indexed
/// by the sequence of their latest access, so the first entry of `order` is
/// always the least recently used key. Sequences are unique, which makes
/// eviction deterministic.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Next sequence number to hand out
    next_sequence: u64,
    /// Access sequence -> key, ascending = oldest first
    order: BTreeMap<u64, String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used and returns its new sequence.
    ///
    /// `previous` is the sequence the key held before, if it was tracked.
    pub fn touch(&mut self, key: &str, previous: Option<u64>) -> u64 {
        if let Some(seq) = previous {
            self.order.remove(&seq);
        }

        let seq = self.next_sequence;
        self.next_sequence += 1;
        self.order.insert(seq, key.to_string());
        seq
    }

    // == Remove ==
    /// Stops tracking the key that holds `sequence`.
    pub fn remove(&mut self, sequence: u64) {
        self.order.remove(&sequence);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub(crate) fn peek_oldest(&self) -> Option<&String> {
        self.order.values().next()
    }

    // == Clear ==
    /// Forgets every key. The sequence counter keeps counting.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
