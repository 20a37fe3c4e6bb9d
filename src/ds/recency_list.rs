//! Hash-keyed recency list.
//!
//! An ordered sequence of keys maintained most-recent-first, with a key →
//! node index so that any key can be erased or promoted in O(1). Nodes live
//! in a [`SlotArena`] and link each other by `SlotId`, avoiding raw
//! back-pointers.
//!
//! ```text
//!   index (FxHashMap<K, SlotId>)
//!   ┌─────┬────────┐
//!   │ key │ SlotId │──────┐
//!   └─────┴────────┘      ▼
//!   head ─► [k_1] ◄──► [k_2] ◄──► [k_3] ◄── tail
//!           (MRU)                  (LRU)
//! ```
//!
//! Both FIFO and LRU engines order their keys with this list: FIFO only
//! pushes on insert and pops at the back, LRU additionally promotes hit keys
//! back to the front.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Ordered key sequence with O(1) push-front, move-to-front, remove-by-key,
/// and pop-back.
#[derive(Debug)]
pub struct RecencyList<K> {
    arena: SlotArena<Node<K>>,
    index: FxHashMap<K, SlotId>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<K> RecencyList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            index: FxHashMap::default(),
            head: None,
            tail: None,
        }
    }

    /// Returns the number of keys in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list holds no keys.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the least recent key (the back of the list).
    pub fn back(&self) -> Option<&K> {
        self.tail
            .and_then(|id| self.arena.get(id).map(|node| &node.key))
    }

    /// Returns the most recent key (the front of the list).
    pub fn front(&self) -> Option<&K> {
        self.head
            .and_then(|id| self.arena.get(id).map(|node| &node.key))
    }

    /// Inserts `key` at the front. Returns `false` if the key was already
    /// present (the existing position is kept).
    pub fn push_front(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        let id = self.arena.insert(Node {
            key: key.clone(),
            prev: None,
            next: self.head,
        });
        if let Some(head) = self.head {
            if let Some(node) = self.arena.get_mut(head) {
                node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        self.index.insert(key, id);
        true
    }

    /// Moves `key` to the front; returns `false` if it is not present.
    pub fn move_to_front(&mut self, key: &K) -> bool {
        let Some(&id) = self.index.get(key) else {
            return false;
        };
        if Some(id) == self.head {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Removes `key` from the list; returns `false` if it is not present.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(id) = self.index.remove(key) else {
            return false;
        };
        self.detach(id);
        self.arena.remove(id);
        true
    }

    /// Removes and returns the least recent key.
    pub fn pop_back(&mut self) -> Option<K> {
        let id = self.tail?;
        self.detach(id);
        let node = self.arena.remove(id)?;
        self.index.remove(&node.key);
        Some(node.key)
    }

    /// Iterates keys front to back (most recent first).
    pub fn iter(&self) -> RecencyIter<'_, K> {
        RecencyIter {
            list: self,
            current: self.head,
        }
    }

    /// Drops every key.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    fn detach(&mut self, id: SlotId) {
        let (prev, next) = {
            let Some(node) = self.arena.get(id) else {
                return;
            };
            (node.prev, node.next)
        };

        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.arena.get_mut(prev_id) {
                prev_node.next = next;
            }
        } else {
            self.head = next;
        }

        if let Some(next_id) = next {
            if let Some(next_node) = self.arena.get_mut(next_id) {
                next_node.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        } else {
            return;
        }
        if let Some(old_head) = old_head {
            if let Some(head_node) = self.arena.get_mut(old_head) {
                head_node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.arena.len(), self.index.len());
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;
        while let Some(id) = current {
            let node = self.arena.get(id).expect("node missing");
            assert_eq!(node.prev, prev);
            assert_eq!(self.index.get(&node.key), Some(&id));
            if node.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len());
        }
        assert_eq!(count, self.len());
    }
}

impl<K> Default for RecencyList<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

pub struct RecencyIter<'a, K> {
    list: &'a RecencyList<K>,
    current: Option<SlotId>,
}

impl<'a, K> Iterator for RecencyIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.key)
    }
}
