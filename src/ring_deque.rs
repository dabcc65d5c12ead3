//! A double-ended queue on a ring buffer.
//!
//! Storage is a `Vec<T>` used for its allocation only: the vec's own length
//! stays 0 at all times, and the live elements are tracked by `head` and
//! `len` over the capacity region. This way dropping or reallocating the
//! vec never touches elements, all element moves go through raw reads and
//! writes, and a panic mid-operation cannot double-drop.
//!
//! Elements wrap around the end of the allocation. Both ends push and pop
//! in O(1) amortised; the middle inserts and removes by bubbling from the
//! nearer end, so those cost O(min(i, len - i)) moves.

use crate::error::Error;
use std::cmp;
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Debug;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr;

pub struct RingDeque<T> {
    // invariant: buf.len() == 0, elements live in buf[head..head+len]
    // taken modulo buf.capacity()
    buf: Vec<T>,
    head: usize,
    len: usize,
}

impl<T> RingDeque<T> {
    pub fn new() -> Self {
        RingDeque {
            buf: Vec::new(),
            head: 0,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RingDeque {
            buf: Vec::with_capacity(capacity),
            head: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    fn physical(&self, index: usize) -> usize {
        let i = self.head + index;
        let cap = self.buf.capacity();
        if i >= cap {
            i - cap
        } else {
            i
        }
    }

    fn read(&self, index: usize) -> T {
        unsafe { ptr::read(self.buf.as_ptr().add(self.physical(index))) }
    }

    fn write(&mut self, index: usize, value: T) {
        let phys = self.physical(index);
        unsafe { ptr::write(self.buf.as_mut_ptr().add(phys), value) }
    }

    /// Moves the elements into a fresh allocation, unwrapping them so the
    /// front lands at physical index 0. The old buffer holds no elements
    /// afterwards and is freed without dropping anything.
    fn migrate_into(&mut self, mut new_buf: Vec<T>) {
        debug_assert!(new_buf.capacity() >= self.len);
        let cap = self.buf.capacity();
        let front_len = cmp::min(self.len, cap - self.head);
        let back_len = self.len - front_len;
        unsafe {
            ptr::copy_nonoverlapping(
                self.buf.as_ptr().add(self.head),
                new_buf.as_mut_ptr(),
                front_len,
            );
            ptr::copy_nonoverlapping(
                self.buf.as_ptr(),
                new_buf.as_mut_ptr().add(front_len),
                back_len,
            );
        }
        self.buf = new_buf;
        self.head = 0;
    }

    fn grow(&mut self) {
        let new_cap = cmp::max(self.buf.capacity() * 2, 1);
        self.migrate_into(Vec::with_capacity(new_cap));
    }

    pub fn reserve(&mut self, additional: usize) {
        let needed = self.len + additional;
        if needed > self.buf.capacity() {
            let new_cap = cmp::max(needed, self.buf.capacity() * 2);
            self.migrate_into(Vec::with_capacity(new_cap));
        }
    }

    /// Like [`reserve`](Self::reserve) but reports allocation failure
    /// instead of aborting.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let needed = self.len + additional;
        if needed > self.buf.capacity() {
            let new_cap = cmp::max(needed, self.buf.capacity() * 2);
            let mut new_buf: Vec<T> = Vec::new();
            new_buf
                .try_reserve_exact(new_cap)
                .map_err(|_| Error::AllocationFailure)?;
            self.migrate_into(new_buf);
        }
        Ok(())
    }

    pub fn shrink_to_fit(&mut self) {
        if self.buf.capacity() > self.len {
            self.migrate_into(Vec::with_capacity(self.len));
        }
    }

    pub fn push_back(&mut self, value: T) {
        if self.len == self.buf.capacity() {
            self.grow();
        }
        self.write(self.len, value);
        self.len += 1;
    }

    pub fn push_front(&mut self, value: T) {
        if self.len == self.buf.capacity() {
            self.grow();
        }
        self.head = if self.head == 0 {
            self.buf.capacity() - 1
        } else {
            self.head - 1
        };
        self.len += 1;
        self.write(0, value);
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.read(0);
        self.head = if self.head + 1 == self.buf.capacity() {
            0
        } else {
            self.head + 1
        };
        self.len -= 1;
        Some(value)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.read(self.len))
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            None
        } else {
            self.get(self.len - 1)
        }
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            None
        } else {
            self.get_mut(self.len - 1)
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(unsafe { &*self.buf.as_ptr().add(self.physical(index)) })
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            let phys = self.physical(index);
            Some(unsafe { &mut *self.buf.as_mut_ptr().add(phys) })
        } else {
            None
        }
    }

    /// Checked access, [`Error::IndexOutOfRange`] past the end.
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        self.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len,
        })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len;
        self.get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Swaps the elements at two positions.
    ///
    /// Panics when either is out of range.
    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(i < self.len, "index {} out of range for length {}", i, self.len);
        assert!(j < self.len, "index {} out of range for length {}", j, self.len);
        let pi = self.physical(i);
        let pj = self.physical(j);
        unsafe {
            let base = self.buf.as_mut_ptr();
            ptr::swap(base.add(pi), base.add(pj));
        }
    }

    /// Inserts at `index`, shifting from the nearer end.
    ///
    /// Panics when `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) {
        assert!(
            index <= self.len,
            "index {} out of range for length {}",
            index,
            self.len
        );
        if index <= self.len / 2 {
            self.push_front(value);
            for i in 0..index {
                self.swap(i, i + 1);
            }
        } else {
            self.push_back(value);
            for i in (index..self.len - 1).rev() {
                self.swap(i, i + 1);
            }
        }
    }

    /// Removes and returns the element at `index`, shifting from the
    /// nearer end. `None` past the end.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        if index <= self.len / 2 {
            for i in (1..=index).rev() {
                self.swap(i, i - 1);
            }
            self.pop_front()
        } else {
            for i in index..self.len - 1 {
                self.swap(i, i + 1);
            }
            self.pop_back()
        }
    }

    pub fn truncate(&mut self, new_len: usize) {
        while self.len > new_len {
            self.pop_back();
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0)
    }

    pub fn resize_with(&mut self, new_len: usize, mut f: impl FnMut() -> T) {
        if new_len <= self.len {
            self.truncate(new_len);
        } else {
            self.reserve(new_len - self.len);
            while self.len < new_len {
                self.push_back(f());
            }
        }
    }

    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        self.resize_with(new_len, || value.clone())
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            deque: self,
            front: 0,
            back: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            ptr: self.buf.as_mut_ptr(),
            cap: self.buf.capacity(),
            head: self.head,
            front: 0,
            back: self.len,
            _marker: PhantomData,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.into_iter().collect()
    }
}

impl<T> Drop for RingDeque<T> {
    fn drop(&mut self) {
        // elements are dropped one by one; a panic in a drop leaks the
        // rest but cannot double-drop since each pop detaches its element
        while self.pop_back().is_some() {}
    }
}

impl<T> Default for RingDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RingDeque<T> {
    fn clone(&self) -> Self {
        let mut res = Self::with_capacity(self.len);
        res.extend(self.iter().cloned());
        res
    }
}

impl<T: Debug> Debug for RingDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Index<usize> for RingDeque<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {} out of range for length {}", index, self.len),
        }
    }
}

impl<T> IndexMut<usize> for RingDeque<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {} out of range for length {}", index, len),
        }
    }
}

impl<T: PartialEq> PartialEq for RingDeque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RingDeque<T> {}

impl<T: PartialOrd> PartialOrd for RingDeque<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for RingDeque<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T> From<Vec<T>> for RingDeque<T> {
    fn from(mut vec: Vec<T>) -> Self {
        let len = vec.len();
        // the elements stay initialized in the capacity region, they are
        // now tracked by head and len instead of the vec length
        unsafe { vec.set_len(0) };
        RingDeque {
            buf: vec,
            head: 0,
            len,
        }
    }
}

impl<T> FromIterator<T> for RingDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut res = Self::with_capacity(iter.size_hint().0);
        res.extend(iter);
        res
    }
}

impl<T> Extend<T> for RingDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

/// Borrowing iterator in front-to-back order.
pub struct Iter<'a, T> {
    deque: &'a RingDeque<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            None
        } else {
            let res = self.deque.get(self.front);
            self.front += 1;
            res
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            None
        } else {
            self.back -= 1;
            self.deque.get(self.back)
        }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            deque: self.deque,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> IntoIterator for &'a RingDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Mutably borrowing iterator in front-to-back order.
pub struct IterMut<'a, T> {
    ptr: *mut T,
    cap: usize,
    head: usize,
    front: usize,
    back: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    fn slot(&self, index: usize) -> *mut T {
        let i = self.head + index;
        let i = if i >= self.cap { i - self.cap } else { i };
        unsafe { self.ptr.add(i) }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            None
        } else {
            let res = unsafe { &mut *self.slot(self.front) };
            self.front += 1;
            Some(res)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            None
        } else {
            self.back -= 1;
            Some(unsafe { &mut *self.slot(self.back) })
        }
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

unsafe impl<'a, T: Send> Send for IterMut<'a, T> {}
unsafe impl<'a, T: Sync> Sync for IterMut<'a, T> {}

impl<'a, T> IntoIterator for &'a mut RingDeque<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

/// Owning iterator in front-to-back order.
pub struct IntoIter<T>(RingDeque<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.0.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for RingDeque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter(self)
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for RingDeque<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for RingDeque<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeqVisitor<T>(PhantomData<T>);

        impl<'de, T: serde::Deserialize<'de>> serde::de::Visitor<'de> for SeqVisitor<T> {
            type Value = RingDeque<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence")
            }

            fn visit_seq<S: serde::de::SeqAccess<'de>>(
                self,
                mut seq: S,
            ) -> Result<Self::Value, S::Error> {
                let mut res = RingDeque::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(value) = seq.next_element()? {
                    res.push_back(value);
                }
                Ok(res)
            }
        }

        deserializer.deserialize_seq(SeqVisitor(PhantomData))
    }
}
