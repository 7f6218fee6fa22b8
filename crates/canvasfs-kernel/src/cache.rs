//! Generation-checked memo cache.
//!
//! Shared by the resolution and listing caches. A lookup that misses
//! records the generation before going to the remote, and only stores its
//! result if no invalidation happened in between. That keeps a slow
//! in-flight lookup from re-inserting a result a mutation just made stale.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;

struct Inner<K, V> {
    generation: u64,
    entries: HashMap<K, V>,
}

/// Unbounded memo map with whole-cache invalidation.
pub(crate) struct MemoCache<K, V> {
    inner: Mutex<Inner<K, V>>,
}

impl<K: Eq + Hash, V: Clone> MemoCache<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                entries: HashMap::new(),
            }),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().entries.get(key).cloned()
    }

    /// Current generation; pass it back to [`Self::insert_if_current`].
    pub(crate) fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Store `value` unless the cache was invalidated since `generation`.
    ///
    /// Returns whether the value was stored.
    pub(crate) fn insert_if_current(&self, generation: u64, key: K, value: V) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return false;
        }
        inner.entries.insert(key, value);
        true
    }

    /// Drop every entry and start a new generation.
    pub(crate) fn invalidate_all(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}
