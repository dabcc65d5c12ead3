//! Sorted-vector sets.
//!
//! [`FlatSet`] keeps one element per equivalence class; [`FlatMultiSet`]
//! keeps all of them, equivalents in insertion order. Both store their
//! elements contiguously in a `SmallVec` in comparator order, so iteration
//! is a slice walk and lookup is a binary search.
//!
//! The comparator defaults to [`Natural`], the `Ord` instance of the
//! element type. A custom comparator is any [`Compare`] implementation and
//! is carried by value in the container.

use crate::cmp::{Compare, CompareQuery, Natural};
use crate::error::Error;
use crate::extract::Identity;
use crate::ordered_core::OrderedCore;
use smallvec::Array;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Debug;
use std::iter::FromIterator;
use std::mem;
use std::ops::Range;

/// A set backed by a sorted `SmallVec`, with up to 2 elements inline.
pub type FlatSet2<T> = FlatSet<[T; 2]>;
/// A multiset backed by a sorted `SmallVec`, with up to 2 elements inline.
pub type FlatMultiSet2<T> = FlatMultiSet<[T; 2]>;

/// A set of elements kept sorted and unique under a comparator.
pub struct FlatSet<A: Array, C = Natural>(OrderedCore<A, Identity, C>);

/// A multiset: like [`FlatSet`] but equivalent elements are all kept, in
/// the order they were inserted.
pub struct FlatMultiSet<A: Array, C = Natural>(OrderedCore<A, Identity, C>);

macro_rules! common_set_impls {
    ($name:ident) => {
        impl<T, A: Array<Item = T>, C> $name<A, C> {
            /// Creates an empty set ordered by `cmp`.
            pub fn with_cmp(cmp: C) -> Self {
                Self(OrderedCore::new(Identity, cmp))
            }

            /// The comparator this set orders by.
            pub fn key_comp(&self) -> &C {
                self.0.cmp()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn capacity(&self) -> usize {
                self.0.capacity()
            }

            pub fn reserve(&mut self, additional: usize) {
                self.0.reserve(additional)
            }

            /// Like [`reserve`](Self::reserve) but reports allocation
            /// failure instead of aborting.
            pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
                self.0.try_reserve(additional)
            }

            pub fn shrink_to_fit(&mut self) {
                self.0.shrink_to_fit()
            }

            pub fn clear(&mut self) {
                self.0.clear()
            }

            /// The elements in sorted order.
            pub fn as_slice(&self) -> &[T] {
                self.0.as_slice()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, T> {
                self.0.as_slice().iter()
            }

            pub fn first(&self) -> Option<&T> {
                self.0.as_slice().first()
            }

            pub fn last(&self) -> Option<&T> {
                self.0.as_slice().last()
            }

            /// The element at a position in the sorted order.
            pub fn get_index(&self, index: usize) -> Option<&T> {
                self.0.get(index)
            }

            /// Removes and returns the element at `index`.
            ///
            /// Panics when `index` is out of range.
            pub fn remove_index(&mut self, index: usize) -> T {
                self.0.remove_at(index)
            }

            /// Removes a range of positions, yielding the elements in
            /// sorted order. `drain(..)` empties the set.
            ///
            /// Panics when the range is out of bounds.
            pub fn drain<R: std::ops::RangeBounds<usize>>(
                &mut self,
                range: R,
            ) -> smallvec::Drain<'_, A> {
                self.0.drain(range)
            }

            /// Keeps only the elements `f` approves of.
            pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
                self.0.retain(|v| f(&*v))
            }

            pub fn into_vec(self) -> Vec<T> {
                self.0.into_vec()
            }

            /// Moves the contents out, leaving an empty set with the same
            /// comparator behind.
            pub fn take(&mut self) -> Self
            where
                C: Clone,
            {
                mem::replace(self, Self::with_cmp(self.0.cmp().clone()))
            }
        }

        impl<T, A: Array<Item = T>, C: Default> $name<A, C> {
            pub fn new() -> Self {
                Self::with_cmp(C::default())
            }

            pub fn with_capacity(capacity: usize) -> Self {
                Self::with_capacity_and_cmp(capacity, C::default())
            }
        }

        impl<T, A: Array<Item = T>, C> $name<A, C> {
            pub fn with_capacity_and_cmp(capacity: usize, cmp: C) -> Self {
                Self(OrderedCore::with_capacity(Identity, cmp, capacity))
            }

            /// Exchanges the contents of two sets, comparators included.
            pub fn swap(&mut self, other: &mut Self) {
                mem::swap(self, other)
            }
        }

        impl<T, A: Array<Item = T>, C: Compare<T>> $name<A, C> {
            /// First position not ordered before `key`.
            pub fn lower_bound(&self, key: &T) -> usize {
                self.0.lower_bound(key)
            }

            /// First position `key` is ordered before.
            pub fn upper_bound(&self, key: &T) -> usize {
                self.0.upper_bound(key)
            }

            /// The positions of the elements equivalent to `key`.
            pub fn equal_range(&self, key: &T) -> Range<usize> {
                self.0.equal_range(key)
            }

            /// The position of the first element equivalent to `key`.
            pub fn find(&self, key: &T) -> Option<usize> {
                self.0.find(key)
            }

            pub fn count(&self, key: &T) -> usize {
                self.0.count(key)
            }

            pub fn contains(&self, key: &T) -> bool {
                self.0.contains(key)
            }

            /// The first stored element equivalent to `key`.
            pub fn get(&self, key: &T) -> Option<&T> {
                match self.0.find(key) {
                    Some(i) => self.0.get(i),
                    None => None,
                }
            }

            /// The element order induced by the key comparator.
            pub fn value_comp(&self) -> impl Fn(&T, &T) -> bool + '_ {
                move |a, b| self.0.value_less(a, b)
            }
        }

        // Transparent lookup. Available for every query type the
        // comparator implements `CompareQuery` for; with `Natural` that is
        // anything the element type can be borrowed as.
        impl<T, A: Array<Item = T>, C: Compare<T>> $name<A, C> {
            pub fn lower_bound_by<Q: ?Sized>(&self, query: &Q) -> usize
            where
                C: CompareQuery<T, Q>,
            {
                self.0.lower_bound_by(query)
            }

            pub fn upper_bound_by<Q: ?Sized>(&self, query: &Q) -> usize
            where
                C: CompareQuery<T, Q>,
            {
                self.0.upper_bound_by(query)
            }

            pub fn equal_range_by<Q: ?Sized>(&self, query: &Q) -> Range<usize>
            where
                C: CompareQuery<T, Q>,
            {
                self.0.equal_range_by(query)
            }

            pub fn find_by<Q: ?Sized>(&self, query: &Q) -> Option<usize>
            where
                C: CompareQuery<T, Q>,
            {
                self.0.find_by(query)
            }

            pub fn count_by<Q: ?Sized>(&self, query: &Q) -> usize
            where
                C: CompareQuery<T, Q>,
            {
                self.0.count_by(query)
            }

            pub fn contains_by<Q: ?Sized>(&self, query: &Q) -> bool
            where
                C: CompareQuery<T, Q>,
            {
                self.0.contains_by(query)
            }

            pub fn get_by<Q: ?Sized>(&self, query: &Q) -> Option<&T>
            where
                C: CompareQuery<T, Q>,
            {
                match self.0.find_by(query) {
                    Some(i) => self.0.get(i),
                    None => None,
                }
            }
        }

        impl<T: Clone, A: Array<Item = T>, C: Clone> Clone for $name<A, C> {
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl<T, A: Array<Item = T>, C: Default> Default for $name<A, C> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T: Debug, A: Array<Item = T>, C> Debug for $name<A, C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_set().entries(self.iter()).finish()
            }
        }

        // Equality is elementwise equivalence under the comparator, and
        // comparison is lexicographic, matching iteration order. `Eq` and
        // `Ord` are deliberately absent: comparator equivalence need not
        // agree with the element type's `Eq`.
        impl<T, A: Array<Item = T>, C: Compare<T>> PartialEq for $name<A, C> {
            fn eq(&self, other: &Self) -> bool {
                self.0.equiv_elements(&other.0)
            }
        }

        impl<T, A: Array<Item = T>, C: Compare<T>> PartialOrd for $name<A, C> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.0.lex_cmp(&other.0))
            }
        }

        impl<'a, T: 'a, A: Array<Item = T>, C> IntoIterator for &'a $name<A, C> {
            type Item = &'a T;
            type IntoIter = std::slice::Iter<'a, T>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<T, A: Array<Item = T>, C> IntoIterator for $name<A, C> {
            type Item = T;
            type IntoIter = smallvec::IntoIter<A>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_inner().into_iter()
            }
        }

        impl<T, A: Array<Item = T>, C: Compare<T> + Default> FromIterator<T> for $name<A, C> {
            fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
                let mut res = Self::new();
                res.extend(iter);
                res
            }
        }

        impl<T, A: Array<Item = T>, C: Compare<T> + Default> From<Vec<T>> for $name<A, C> {
            fn from(vec: Vec<T>) -> Self {
                vec.into_iter().collect()
            }
        }

        #[cfg(feature = "serde")]
        impl<T: serde::Serialize, A: Array<Item = T>, C> serde::Serialize for $name<A, C> {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_seq(self.as_slice())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de, T, A, C> serde::Deserialize<'de> for $name<A, C>
        where
            T: serde::Deserialize<'de>,
            A: Array<Item = T>,
            C: Compare<T> + Default,
        {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct SeqVisitor<A, C>(std::marker::PhantomData<(A, C)>);

                impl<'de, T, A, C> serde::de::Visitor<'de> for SeqVisitor<A, C>
                where
                    T: serde::Deserialize<'de>,
                    A: Array<Item = T>,
                    C: Compare<T> + Default,
                {
                    type Value = $name<A, C>;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        f.write_str("a sequence")
                    }

                    fn visit_seq<S: serde::de::SeqAccess<'de>>(
                        self,
                        mut seq: S,
                    ) -> Result<Self::Value, S::Error> {
                        let mut res = $name::with_capacity(seq.size_hint().unwrap_or(0));
                        while let Some(value) = seq.next_element()? {
                            res.insert(value);
                        }
                        Ok(res)
                    }
                }

                deserializer.deserialize_seq(SeqVisitor(std::marker::PhantomData))
            }
        }
    };
}

common_set_impls!(FlatSet);
common_set_impls!(FlatMultiSet);

impl<T, A: Array<Item = T>, C: Compare<T>> FlatSet<A, C> {
    /// Inserts `value` unless an equivalent element is already present.
    ///
    /// Returns the element's position and whether it was inserted. When an
    /// equivalent element exists it is kept and `value` is dropped.
    pub fn insert(&mut self, value: T) -> (usize, bool) {
        self.0.insert_unique(value)
    }

    /// Inserts with a position hint, typically the result of a previous
    /// insertion or `len()` when building from sorted input. A correct
    /// hint makes the insertion cost O(1) comparisons amortised; a wrong
    /// hint only costs a binary search.
    ///
    /// Panics when `hint > len()`.
    pub fn insert_hint(&mut self, hint: usize, value: T) -> usize {
        self.0.insert_unique_hint(hint, value).0
    }

    /// Removes the element equivalent to `key`, if any.
    pub fn remove(&mut self, key: &T) -> bool {
        self.0.remove_key(key) > 0
    }

    /// Transparent removal, see [`contains_by`](Self::contains_by).
    pub fn remove_by<Q: ?Sized>(&mut self, query: &Q) -> bool
    where
        C: CompareQuery<T, Q>,
    {
        self.0.remove_key_by(query) > 0
    }
}

impl<T, A: Array<Item = T>, C: Compare<T>> Extend<T> for FlatSet<A, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend_unique(iter)
    }
}

impl<T: Ord, A: Array<Item = T>> From<BTreeSet<T>> for FlatSet<A, Natural> {
    fn from(value: BTreeSet<T>) -> Self {
        // already sorted and unique, so the hinted path is linear
        let mut res = Self::new();
        res.extend(value);
        res
    }
}

impl<T, A: Array<Item = T>, C: Compare<T>> FlatMultiSet<A, C> {
    /// Inserts `value`, keeping it after all equivalent elements already
    /// present. Returns its position.
    pub fn insert(&mut self, value: T) -> usize {
        self.0.insert_stable(value)
    }

    /// Hinted insertion, see [`FlatSet::insert_hint`]. Insertion order of
    /// equivalents is preserved no matter what the hint is.
    ///
    /// Panics when `hint > len()`.
    pub fn insert_hint(&mut self, hint: usize, value: T) -> usize {
        self.0.insert_stable_hint(hint, value)
    }

    /// Removes every element equivalent to `key`, returning how many were
    /// removed.
    pub fn remove(&mut self, key: &T) -> usize {
        self.0.remove_key(key)
    }

    pub fn remove_by<Q: ?Sized>(&mut self, query: &Q) -> usize
    where
        C: CompareQuery<T, Q>,
    {
        self.0.remove_key_by(query)
    }

    /// All elements equivalent to `key`, in insertion order.
    pub fn get_all(&self, key: &T) -> &[T] {
        &self.0.as_slice()[self.0.equal_range(key)]
    }
}

impl<T, A: Array<Item = T>, C: Compare<T>> Extend<T> for FlatMultiSet<A, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend_stable(iter)
    }
}

impl<T: Ord, A: Array<Item = T>> From<BTreeSet<T>> for FlatMultiSet<A, Natural> {
    fn from(value: BTreeSet<T>) -> Self {
        let mut res = Self::new();
        res.extend(value);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, Arbitrary, Gen};
    use std::collections::BTreeSet;

    impl<T: Arbitrary + Ord> Arbitrary for FlatSet2<T> {
        fn arbitrary(g: &mut Gen) -> Self {
            Vec::<T>::arbitrary(g).into()
        }
    }

    impl<T: Arbitrary + Ord> Arbitrary for FlatMultiSet2<T> {
        fn arbitrary(g: &mut Gen) -> Self {
            Vec::<T>::arbitrary(g).into()
        }
    }

    type Test = FlatSet2<i64>;
    type Reference = BTreeSet<i64>;

    fn is_sorted_unique(s: &Test) -> bool {
        s.as_slice().windows(2).all(|w| w[0] < w[1])
    }

    #[test]
    fn set_insert_lookup() {
        let mut s: FlatSet2<i32> = FlatSet::new();
        for v in [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5].iter() {
            s.insert(*v);
        }
        assert_eq!(s.as_slice(), &[1, 2, 3, 4, 5, 6, 9]);
        assert_eq!(s.len(), 7);
        assert_eq!(s.count(&5), 1);
        assert!(!s.contains(&0));
        assert_eq!(s.lower_bound(&4), 3);
        assert_eq!(s.upper_bound(&4), 4);
    }

    /// Comparator over pairs that only consults the first component.
    #[derive(Debug, Clone, Copy, Default)]
    struct FirstOnly;

    impl Compare<(i32, i32)> for FirstOnly {
        fn less(&self, a: &(i32, i32), b: &(i32, i32)) -> bool {
            a.0 < b.0
        }
    }

    #[test]
    fn multiset_is_stable() {
        let mut s: FlatMultiSet<[(i32, i32); 2], FirstOnly> = FlatMultiSet::new();
        for pair in [(0, 0), (0, 1), (0, 2), (1, 0), (0, 3)].iter() {
            s.insert(*pair);
        }
        assert_eq!(s.as_slice(), &[(0, 0), (0, 1), (0, 2), (0, 3), (1, 0)]);
        assert_eq!(s.count(&(0, 99)), 4);
        assert_eq!(s.get_all(&(0, 0)), &[(0, 0), (0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn hinted_end_bulk_insert() {
        let mut s: FlatSet2<u32> = FlatSet::new();
        for i in 0..1000 {
            let pos = s.insert_hint(s.len(), i);
            assert_eq!(pos, i as usize);
        }
        assert_eq!(s.len(), 1000);
        assert!(s.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn multiset_remove_takes_equal_range() {
        let mut s: FlatMultiSet2<i32> = vec![1, 1, 2, 2, 2, 3].into();
        assert_eq!(s.remove(&2), 3);
        assert_eq!(s.as_slice(), &[1, 1, 3]);
        assert_eq!(s.remove(&2), 0);
    }

    #[test]
    fn lexicographic_order() {
        let a: FlatSet2<i32> = vec![1, 2, 3].into();
        let b: FlatSet2<i32> = vec![1, 2, 4].into();
        let c: FlatSet2<i32> = vec![1, 2, 3, 4].into();
        assert!(a < b);
        assert!(a < c);
        let m1: FlatMultiSet2<i32> = vec![1, 1, 2].into();
        let m2: FlatMultiSet2<i32> = vec![1, 2, 1].into();
        assert!(m1 == m2);
    }

    #[test]
    fn transparent_lookup_with_str() {
        let mut s: FlatSet2<String> = FlatSet::new();
        s.insert("bee".to_string());
        s.insert("ant".to_string());
        s.insert("cat".to_string());
        assert!(s.contains_by("bee"));
        assert_eq!(s.get_by("ant").map(|s| s.as_str()), Some("ant"));
        assert_eq!(s.find_by("dog"), None);
        assert!(s.remove_by("cat"));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn reverse_comparator() {
        use crate::cmp::Reverse;
        let mut s: FlatSet<[i32; 2], Reverse> = FlatSet::new();
        for v in [1, 3, 2].iter() {
            s.insert(*v);
        }
        assert_eq!(s.as_slice(), &[3, 2, 1]);
        assert!(s.contains(&2));
    }

    #[test]
    fn retain_and_drain() {
        let mut s: FlatSet2<i32> = (0..10).collect();
        s.retain(|v| v % 2 == 0);
        assert_eq!(s.as_slice(), &[0, 2, 4, 6, 8]);
        let drained: Vec<i32> = s.drain(..).collect();
        assert_eq!(drained, vec![0, 2, 4, 6, 8]);
        assert!(s.is_empty());
    }

    #[test]
    fn take_keeps_comparator() {
        let mut s: FlatSet2<i32> = vec![1, 2].into();
        let t = s.take();
        assert!(s.is_empty());
        assert_eq!(t.as_slice(), &[1, 2]);
    }

    quickcheck! {
        fn matches_btreeset(values: Vec<i64>) -> bool {
            let s: Test = values.clone().into();
            let r: Reference = values.into_iter().collect();
            is_sorted_unique(&s) && s.iter().eq(r.iter())
        }

        fn hint_never_changes_contents(values: Vec<(usize, i64)>) -> bool {
            let mut plain: Test = FlatSet::new();
            let mut hinted: Test = FlatSet::new();
            for (hint, v) in values {
                plain.insert(v);
                hinted.insert_hint(hint % (hinted.len() + 1), v);
            }
            plain.as_slice() == hinted.as_slice()
        }

        fn remove_matches_btreeset(values: Vec<i64>, victims: Vec<i64>) -> bool {
            let mut s: Test = values.clone().into();
            let mut r: Reference = values.into_iter().collect();
            for v in victims {
                if s.remove(&v) != r.remove(&v) {
                    return false;
                }
            }
            s.iter().eq(r.iter())
        }

        fn multiset_counts(values: Vec<i8>) -> bool {
            let s: FlatMultiSet2<i8> = values.clone().into();
            s.len() == values.len()
                && values
                    .iter()
                    .all(|v| s.count(v) == values.iter().filter(|w| *w == v).count())
        }

        fn insertion_reports_true_position(values: Vec<i64>) -> bool {
            let mut s: Test = FlatSet::new();
            for v in values {
                let (pos, _) = s.insert(v);
                if s.as_slice()[pos] != v {
                    return false;
                }
            }
            true
        }

        fn eq_agrees_with_slices(a: Test, b: Test) -> bool {
            (a == b) == (a.as_slice() == b.as_slice())
        }
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn set_json_round_trip() {
            let s: FlatSet2<i32> = vec![3, 1, 2].into();
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, "[1,2,3]");
            let back: FlatSet2<i32> = serde_json::from_str("[3,1,2,2]").unwrap();
            assert_eq!(back, s);
        }

        #[test]
        fn multiset_json_keeps_duplicates() {
            let s: FlatMultiSet2<i32> = vec![2, 1, 2].into();
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, "[1,2,2]");
            let back: FlatMultiSet2<i32> = serde_json::from_str(&json).unwrap();
            assert_eq!(back.as_slice(), s.as_slice());
        }
    }
}
