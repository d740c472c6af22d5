//! Arena-backed doubly-linked recency list.
//!
//! Nodes live in a `Vec` and link to each other by index, with slot 0 acting
//! as the sentinel root: `root.next` is the most recently used key and
//! `root.prev` the least recently used one. Removed slots go onto a free list
//! and are handed out again by the next push, so a full container that evicts
//! on every insert never grows its arena.

const ROOT: usize = 0;

struct Node<K> {
    key: Option<K>,
    prev: usize,
    next: usize,
}

impl<K> Node<K> {
    fn detached(key: Option<K>) -> Self {
        Self {
            key,
            prev: ROOT,
            next: ROOT,
        }
    }
}

pub(crate) struct RecencyList<K> {
    nodes: Vec<Node<K>>,
    free: Vec<usize>,
}

impl<K> RecencyList<K> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::detached(None)],
            free: Vec::new(),
        }
    }

    /// Insert `key` at the front and return its slot.
    pub(crate) fn push_front(&mut self, key: K) -> usize {
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Node::detached(Some(key));
                slot
            }
            None => {
                self.nodes.push(Node::detached(Some(key)));
                self.nodes.len() - 1
            }
        };
        self.link_front(slot);
        slot
    }

    pub(crate) fn move_to_front(&mut self, slot: usize) {
        if slot == ROOT || self.nodes[ROOT].next == slot {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    /// Unlink `slot`, release it for reuse and return its key.
    pub(crate) fn remove(&mut self, slot: usize) -> Option<K> {
        if slot == ROOT {
            return None;
        }
        let key = self.nodes[slot].key.take()?;
        self.unlink(slot);
        self.nodes[slot].prev = ROOT;
        self.nodes[slot].next = ROOT;
        self.free.push(slot);
        Some(key)
    }

    /// The least recently used key.
    pub(crate) fn last(&self) -> Option<&K> {
        let slot = self.nodes[ROOT].prev;
        if slot == ROOT {
            return None;
        }
        self.nodes[slot].key.as_ref()
    }

    /// Remove and return the least recently used key.
    pub(crate) fn pop_back(&mut self) -> Option<K> {
        let slot = self.nodes[ROOT].prev;
        self.remove(slot)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT].prev = ROOT;
        self.nodes[ROOT].next = ROOT;
        self.free.clear();
    }

    /// Keys from most to least recently used.
    pub(crate) fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            cursor: ROOT,
        }
    }

    /// Number of allocated node slots, including the root and free slots.
    #[cfg(test)]
    pub(crate) fn allocated(&self) -> usize {
        self.nodes.len()
    }

    fn link_front(&mut self, slot: usize) {
        let first = self.nodes[ROOT].next;
        self.nodes[slot].prev = ROOT;
        self.nodes[slot].next = first;
        self.nodes[first].prev = slot;
        self.nodes[ROOT].next = slot;
    }

    fn unlink(&mut self, slot: usize) {
        let prev = self.nodes[slot].prev;
        let next = self.nodes[slot].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }
}

pub(crate) struct Iter<'a, K> {
    list: &'a RecencyList<K>,
    cursor: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor = self.list.nodes[self.cursor].next;
        if self.cursor == ROOT {
            return None;
        }
        self.list.nodes[self.cursor].key.as_ref()
    }
}
