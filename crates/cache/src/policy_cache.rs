// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A generic in-memory cache with an LRU eviction policy, an optional TTL,
//! and a persistent tier exempt from both. This is the in-memory half of
//! every cache adapter in [`crate::adapters`]; the on-disk half lives
//! behind `loom_storage`.

use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

struct Entry<V> {
    value: V,
    cached_at: Instant,
}

/// Policy for one cache adapter, matching the per-kind table in the
/// project cache design: a bounded/unbounded LRU tier for ordinary
/// entries, an optional TTL, and a persistent tier for entries that
/// should survive both (seeded immediately after a `save`).
pub struct PolicyCache<K: Hash + Eq + Clone, V: Clone> {
    ttl: Option<Duration>,
    lru: Mutex<LruCache<K, Entry<V>>>,
    persistent: Mutex<HashMap<K, V>>,
}

/// `None` maxsize means unbounded; represented internally as a very large
/// capacity rather than a second code path, matching how `lru` models it.
const UNBOUNDED: usize = usize::MAX >> 1;

impl<K: Hash + Eq + Clone, V: Clone> PolicyCache<K, V> {
    pub fn new(maxsize: Option<usize>, ttl: Option<Duration>) -> Self {
        let cap = NonZeroUsize::new(maxsize.unwrap_or(UNBOUNDED).max(1))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            lru: Mutex::new(LruCache::new(cap)),
            persistent: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a cached value if present and, for non-persistent entries,
    /// not yet expired. An expired entry is evicted as a side effect.
    pub fn get(&self, key: &K) -> Option<V> {
        if let Some(value) = self.persistent.lock().get(key) {
            return Some(value.clone());
        }
        let mut lru = self.lru.lock();
        let expired = match lru.peek(key) {
            Some(entry) => self.ttl.is_some_and(|ttl| entry.cached_at.elapsed() > ttl),
            None => return None,
        };
        if expired {
            lru.pop(key);
            return None;
        }
        lru.get(key).map(|entry| entry.value.clone())
    }

    /// Inserts `value`. `persistent` entries bypass LRU eviction and TTL
    /// expiry entirely and are removed only by an explicit `invalidate`.
    pub fn set(&self, key: K, value: V, persistent: bool) {
        if persistent {
            self.persistent.lock().insert(key.clone(), value);
            self.lru.lock().pop(&key);
        } else {
            self.lru.lock().put(
                key,
                Entry {
                    value,
                    cached_at: Instant::now(),
                },
            );
        }
    }

    pub fn invalidate(&self, key: &K) {
        self.persistent.lock().remove(key);
        self.lru.lock().pop(key);
    }

    pub fn invalidate_all(&self) {
        self.persistent.lock().clear();
        self.lru.lock().clear();
    }

    pub fn invalidate_matching(&self, mut predicate: impl FnMut(&K) -> bool) {
        self.persistent.lock().retain(|k, _| !predicate(k));
        let mut lru = self.lru.lock();
        let stale: Vec<K> = lru.iter().map(|(k, _)| k.clone()).filter(|k| predicate(k)).collect();
        for k in stale {
            lru.pop(&k);
        }
    }
}

#[cfg(test)]
#[path = "policy_cache_tests.rs"]
mod tests;
