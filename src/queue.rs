//! A FIFO queue adaptor over [`RingDeque`].

use crate::ring_deque::RingDeque;
use std::fmt;
use std::fmt::Debug;
use std::iter::FromIterator;

/// First-in first-out queue. Pushes at the back, pops at the front, both
/// O(1) amortised.
pub struct Queue<T> {
    data: RingDeque<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Queue {
            data: RingDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Queue {
            data: RingDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, value: T) {
        self.data.push_back(value)
    }

    /// Removes and returns the oldest element.
    pub fn pop(&mut self) -> Option<T> {
        self.data.pop_front()
    }

    /// The element [`pop`](Self::pop) would return.
    pub fn front(&self) -> Option<&T> {
        self.data.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.data.front_mut()
    }

    /// The most recently pushed element.
    pub fn back(&self) -> Option<&T> {
        self.data.back()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.data.back_mut()
    }

    pub fn clear(&mut self) {
        self.data.clear()
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other)
    }

    /// The underlying deque, elements in pop order.
    pub fn into_inner(self) -> RingDeque<T> {
        self.data
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Queue {
            data: self.data.clone(),
        }
    }
}

impl<T: Debug> Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue").field("data", &self.data).finish()
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for Queue<T> {}

impl<T> From<RingDeque<T>> for Queue<T> {
    fn from(data: RingDeque<T>) -> Self {
        Queue { data }
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Queue {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.data.extend(iter)
    }
}
