//! Free-list integer allocator.
//!
//! Used to hand out small, dense identifiers (editor tab ids and the like) that can be
//! returned and reused. [`IdPool::get`] always lends the smallest free non-negative integer.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};
use thiserror::Error;

/// Errors reported when an id is handed back incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdPoolError {
    #[error("attempted to return out of bounds id {value} (watermark {watermark})")]
    /// The id was never lent out: it is at or above the watermark.
    OutOfRange {
        /// The id that was returned.
        value: usize,
        /// The pool's watermark at the time of the call.
        watermark: usize,
    },

    #[error("attempted to return id {0}, which is not lent out")]
    /// The id is below the watermark but already free.
    NotLent(usize),
}

/// A pool of non-negative integer ids.
///
/// Every integer below the watermark is either lent out or sits exactly once in the free heap;
/// every integer at or above the watermark is unused.
#[derive(Debug, Clone, Default)]
pub struct IdPool {
    next_fresh: usize,
    free: BinaryHeap<Reverse<usize>>,
}

impl IdPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// One higher than the highest id that may currently be lent out.
    pub fn watermark(&self) -> usize {
        self.next_fresh
    }

    /// Lend the smallest free id.
    pub fn get(&mut self) -> usize {
        match self.free.pop() {
            Some(Reverse(id)) => id,
            None => {
                let id = self.next_fresh;
                self.next_fresh += 1;
                id
            }
        }
    }

    /// Forcibly mark `value` as lent, whether or not it was free.
    ///
    /// Taking an id at or above the watermark raises the watermark and frees every id skipped
    /// on the way.
    pub fn take(&mut self, value: usize) {
        if value >= self.next_fresh {
            self.free.extend((self.next_fresh..=value).map(Reverse));
            self.next_fresh = value + 1;
        }
        self.free.retain(|Reverse(id)| *id != value);
    }

    /// Hand `value` back to the pool.
    pub fn release(&mut self, value: usize) -> Result<(), IdPoolError> {
        if value >= self.next_fresh {
            return Err(IdPoolError::OutOfRange {
                value,
                watermark: self.next_fresh,
            });
        }
        if self.is_free(value) {
            return Err(IdPoolError::NotLent(value));
        }

        if value + 1 == self.next_fresh {
            self.next_fresh -= 1;
        } else {
            self.free.push(Reverse(value));
        }
        Ok(())
    }

    /// Returns `true` if `value` is currently lent out.
    pub fn is_lent(&self, value: usize) -> bool {
        value < self.next_fresh && !self.is_free(value)
    }

    /// All ids currently lent out, ascending.
    pub fn missing_values(&self) -> Vec<usize> {
        let free: BTreeSet<usize> = self.free.iter().map(|Reverse(id)| *id).collect();
        (0..self.next_fresh).filter(|id| !free.contains(id)).collect()
    }

    fn is_free(&self, value: usize) -> bool {
        self.free.iter().any(|Reverse(id)| *id == value)
    }
}
