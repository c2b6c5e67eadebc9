//! Doubly linked list over a slot arena.
//!
//! Nodes live in a [`SlotMap`] and refer to their neighbours by key instead of by pointer.
//! Inserting at either end and removing a node given its [`NodeHandle`] are O(1); a handle
//! whose node was already removed is rejected rather than corrupting the list.

use slotmap::{SlotMap, new_key_type};
use std::iter::FusedIterator;

new_key_type! {
    /// Stable handle to a node of a [`DoublyLinkedList`].
    pub struct NodeHandle;
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<NodeHandle>,
    next: Option<NodeHandle>,
}

/// Ordered container with O(1) front/back insertion and O(1) removal by handle.
#[derive(Debug, Clone)]
pub struct DoublyLinkedList<T> {
    nodes: SlotMap<NodeHandle, Node<T>>,
    head: Option<NodeHandle>,
    tail: Option<NodeHandle>,
}

impl<T> DoublyLinkedList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    /// Number of values in the list.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handle of the front node.
    pub fn first(&self) -> Option<NodeHandle> {
        self.head
    }

    /// Handle of the back node.
    pub fn last(&self) -> Option<NodeHandle> {
        self.tail
    }

    /// Value stored at `handle`, if the node is still in the list.
    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        self.nodes.get(handle).map(|node| &node.value)
    }

    /// Insert `value` at the front and return its handle.
    pub fn push_front(&mut self, value: T) -> NodeHandle {
        let next = self.head;
        let handle = self.nodes.insert(Node {
            value,
            prev: None,
            next,
        });
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(node) => node.prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
        handle
    }

    /// Insert `value` at the back and return its handle.
    pub fn push_back(&mut self, value: T) -> NodeHandle {
        let prev = self.tail;
        let handle = self.nodes.insert(Node {
            value,
            prev,
            next: None,
        });
        match prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(node) => node.next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        handle
    }

    /// Unlink the node at `handle` and return its value.
    ///
    /// Returns `None` when the handle does not refer to a live node (e.g. removed twice).
    pub fn remove(&mut self, handle: NodeHandle) -> Option<T> {
        let node = self.nodes.remove(handle)?;

        match node.prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(prev) => prev.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|n| self.nodes.get_mut(n)) {
            Some(next) => next.prev = node.prev,
            None => self.tail = node.prev,
        }

        Some(node.value)
    }

    /// Remove and return the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    /// Zero-based position of the node at `handle`, counted from the front. O(n).
    pub fn index_of(&self, handle: NodeHandle) -> Option<usize> {
        self.handles().position(|h| h == handle)
    }

    /// Iterate over the values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        std::iter::successors(self.head, |h| self.nodes.get(*h).and_then(|node| node.next))
    }
}

impl<T: PartialEq> DoublyLinkedList<T> {
    /// Zero-based position of the first node holding `value`. O(n).
    pub fn position(&self, value: &T) -> Option<usize> {
        self.iter().position(|v| v == value)
    }
}

impl<T> Default for DoublyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a [`DoublyLinkedList`].
pub struct Iter<'a, T> {
    list: &'a DoublyLinkedList<T>,
    cursor: Option<NodeHandle>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.nodes.get(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a DoublyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
