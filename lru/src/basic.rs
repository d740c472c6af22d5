//! Single-threaded LRU container.

use std::collections::HashMap;
use std::hash::Hash;

use crate::list::RecencyList;

struct Entry<V> {
    slot: usize,
    value: V,
}

/// A fixed-capacity map that evicts its least recently used entry.
///
/// Every operation is O(1) amortized. Not safe for concurrent use; wrap it in
/// [`LruCache`](crate::LruCache) for that.
pub struct BasicLru<K, V> {
    list: RecencyList<K>,
    items: HashMap<K, Entry<V>>,
    capacity: usize,
}

impl<K, V> BasicLru<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty container. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            list: RecencyList::new(),
            items: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert or update `key`. Returns `true` if another entry was evicted to
    /// make room.
    pub fn add(&mut self, key: K, value: V) -> bool {
        self.push(key, value).is_some()
    }

    /// Insert or update `key`, handing back the evicted entry, if any.
    ///
    /// Updating an existing key replaces its value and marks it most recently
    /// used without evicting anything.
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(entry) = self.items.get_mut(&key) {
            entry.value = value;
            self.list.move_to_front(entry.slot);
            return None;
        }

        let evicted = if self.items.len() >= self.capacity {
            self.remove_oldest()
        } else {
            None
        };

        // The evicted entry's node slot is recycled here.
        let slot = self.list.push_front(key.clone());
        self.items.insert(key, Entry { slot, value });
        evicted
    }

    /// Look up `key` and mark it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let entry = self.items.get(key)?;
        self.list.move_to_front(entry.slot);
        Some(&entry.value)
    }

    /// Look up `key` without touching its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.items.get(key).map(|entry| &entry.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }

    /// The least recently used entry. Does not update recency.
    pub fn get_oldest(&self) -> Option<(&K, &V)> {
        let key = self.list.last()?;
        let entry = self.items.get(key)?;
        Some((key, &entry.value))
    }

    /// Remove and return the least recently used entry.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let key = self.list.pop_back()?;
        let entry = self.items.remove(&key)?;
        Some((key, entry.value))
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.items.remove(key)?;
        self.list.remove(entry.slot);
        Some(entry.value)
    }

    /// Drop every entry.
    pub fn purge(&mut self) {
        self.items.clear();
        self.list.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        self.list.iter().cloned().collect()
    }

    /// All entries, most recently used first.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.list
            .iter()
            .filter_map(|key| self.items.get(key).map(|entry| (key, &entry.value)))
    }

    #[cfg(test)]
    fn allocated_slots(&self) -> usize {
        self.list.allocated()
    }
}
