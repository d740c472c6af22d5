//! Thread-safe LRU container.

use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::basic::BasicLru;

/// A [`BasicLru`] behind a mutex.
///
/// Every operation takes the lock for its own duration only, so concurrent
/// callers observe a serialized view of membership and recency. Values are
/// returned by clone; store `Arc`s for anything expensive.
pub struct LruCache<K, V> {
    inner: Mutex<BasicLru<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(BasicLru::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BasicLru<K, V>> {
        // The container is consistent after every call, so a panic elsewhere
        // while holding the lock leaves nothing half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Insert or update `key`. Returns `true` if an entry was evicted.
    pub fn add(&self, key: K, value: V) -> bool {
        self.lock().add(key, value)
    }

    /// Insert or update `key`, handing back the evicted entry, if any.
    pub fn push(&self, key: K, value: V) -> Option<(K, V)> {
        self.lock().push(key, value)
    }

    /// Look up `key` and mark it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Look up `key` without touching its recency.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.lock().peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.lock().contains(key)
    }

    pub fn get_oldest(&self) -> Option<(K, V)> {
        self.lock()
            .get_oldest()
            .map(|(key, value)| (key.clone(), value.clone()))
    }

    pub fn remove_oldest(&self) -> Option<(K, V)> {
        self.lock().remove_oldest()
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.lock().remove(key)
    }

    pub fn purge(&self) {
        self.lock().purge();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        self.lock().keys()
    }
}
