//! Fixed-capacity memoization cache with least-recently-touched eviction.
//!
//! Every expensive step of the engine (selector parsing, nested resolution,
//! stripping, family keys) runs over every rule of every file on every lint
//! pass, so each gets its own bounded cache. The cache is purely a
//! performance device: eviction must never change an observable result, only
//! how often a value is recomputed.

use std::collections::HashMap;
use std::hash::Hash;

/// Capacity used when a configured value is invalid.
pub const DEFAULT_CAPACITY: usize = 1000;

/// A key → value store with a hard entry cap.
///
/// Each `get` touches the entry with a monotonic counter; when an insert
/// would exceed capacity, the entry with the smallest touch stamp is evicted.
/// Eviction is a linear scan, which is fine for the capacities this engine
/// runs with (hundreds to low thousands).
#[derive(Debug)]
pub struct LruCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    capacity: usize,
    clock: u64,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    touched: u64,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is replaced with [`DEFAULT_CAPACITY`]; a cache that can
    /// hold nothing would turn every lookup into a recompute and the engine
    /// never wants that silently.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        Self {
            entries: HashMap::with_capacity(capacity.min(64)),
            capacity,
            clock: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up `key`, marking it most-recently-touched on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.clock += 1;
        let clock = self.clock;
        self.entries.get_mut(key).map(|entry| {
            entry.touched = clock;
            &entry.value
        })
    }

    /// Insert `value` under `key`, evicting the least-recently-touched entry
    /// if the cache is full. Replacing an existing key never evicts.
    pub fn insert(&mut self, key: K, value: V) {
        self.clock += 1;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            key,
            Entry {
                value,
                touched: self.clock,
            },
        );
    }

    /// Fetch the cached value, computing and inserting it on a miss.
    pub fn get_or_insert_with(&mut self, key: &K, compute: impl FnOnce() -> V) -> &V {
        if !self.entries.contains_key(key) {
            let value = compute();
            self.insert(key.clone(), value);
        }
        self.get(key).unwrap_or_else(|| unreachable!("just inserted"))
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.touched)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_values() {
        let mut cache: LruCache<String, u32> = LruCache::new(4);
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        assert_eq!(cache.get(&"a".into()), Some(&1));
        assert_eq!(cache.get(&"b".into()), Some(&2));
        assert_eq!(cache.get(&"c".into()), None);
    }

    #[test]
    fn evicts_least_recently_touched() {
        let mut cache: LruCache<&str, u32> = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);

        // Touch "a" so "b" becomes the oldest.
        let _ = cache.get(&"a");

        cache.insert("c", 3);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"c"), Some(&3));
    }

    #[test]
    fn replacing_existing_key_does_not_evict() {
        let mut cache: LruCache<&str, u32> = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(&10));
        assert_eq!(cache.get(&"b"), Some(&2));
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut cache: LruCache<u32, u32> = LruCache::new(8);
        for i in 0..100 {
            cache.insert(i, i);
        }
        assert_eq!(cache.len(), 8);
    }

    #[test]
    fn zero_capacity_falls_back_to_default() {
        let cache: LruCache<u32, u32> = LruCache::new(0);
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let mut cache: LruCache<&str, u32> = LruCache::new(4);
        let mut calls = 0;
        let v = *cache.get_or_insert_with(&"k", || {
            calls += 1;
            7
        });
        assert_eq!(v, 7);
        let v = *cache.get_or_insert_with(&"k", || {
            calls += 1;
            8
        });
        assert_eq!(v, 7);
        assert_eq!(calls, 1);
    }
}
