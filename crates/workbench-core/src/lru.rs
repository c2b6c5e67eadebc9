//! Fixed-capacity recency ranking.
//!
//! [`LruList`] keeps at most `capacity` distinct values ordered from most to least recently
//! used. Its [`LruList::compare`] method is a total order usable as a sort key for arbitrary
//! values, which is how autocomplete suggestions float previously chosen options to the top.

use crate::linked_list::{DoublyLinkedList, NodeHandle};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Comparator used to order two values that are both absent from the recency list.
pub type FallbackComparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// A list indexed by order of use; the front is the most recently used value.
pub struct LruList<T> {
    capacity: usize,
    order: DoublyLinkedList<T>,
    handles: HashMap<T, NodeHandle>,
    fallback: Option<FallbackComparator<T>>,
}

impl<T: Clone + Eq + Hash> LruList<T> {
    /// Create an empty list that evicts once it holds `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: DoublyLinkedList::new(),
            handles: HashMap::with_capacity(capacity),
            fallback: None,
        }
    }

    /// Builder-style variant of [`LruList::set_fallback`].
    pub fn with_fallback(mut self, fallback: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        self.set_fallback(fallback);
        self
    }

    /// Set the comparator used for two values that are not in the list.
    pub fn set_fallback(&mut self, fallback: impl Fn(&T, &T) -> Ordering + 'static) {
        self.fallback = Some(Box::new(fallback));
    }

    /// Maximum number of values kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of values currently ranked.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing has been put yet.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if `value` is currently ranked.
    pub fn contains(&self, value: &T) -> bool {
        self.handles.contains_key(value)
    }

    /// Mark `value` as the most recently used value.
    ///
    /// A new value inserted while the list is full evicts the least recently used one.
    pub fn put(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }

        if let Some(handle) = self.handles.remove(&value) {
            self.order.remove(handle);
        } else if self.order.len() >= self.capacity
            && let Some(evicted) = self.order.pop_back()
        {
            self.handles.remove(&evicted);
        }

        let handle = self.order.push_front(value.clone());
        self.handles.insert(value, handle);
    }

    /// Recency rank of `value` (0 = most recent), or `None` if it is not ranked.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        let handle = self.handles.get(value)?;
        self.order.index_of(*handle)
    }

    /// Order two values by recency.
    ///
    /// Ranked values sort by rank, any ranked value sorts before an unranked one, and two
    /// unranked values defer to the fallback comparator (or compare equal without one).
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        match (self.index_of(a), self.index_of(b)) {
            (Some(pa), Some(pb)) => pa.cmp(&pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .fallback
                .as_ref()
                .map_or(Ordering::Equal, |fallback| fallback(a, b)),
        }
    }

    /// Sort `values` in place using [`LruList::compare`].
    pub fn sort(&self, values: &mut [T]) {
        values.sort_by(|a, b| self.compare(a, b));
    }

    /// Iterate over the ranked values, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for LruList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruList")
            .field("capacity", &self.capacity)
            .field("order", &self.order.iter().collect::<Vec<_>>())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}
