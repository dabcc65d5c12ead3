//! Sorted-vector maps.
//!
//! [`FlatMap`] and [`FlatMultiMap`] store `(key, value)` pairs contiguously
//! in key order. The unique map keeps one pair per key equivalence class;
//! the multimap keeps all pairs, equivalents in insertion order. Values
//! never participate in ordering or lookup.

use crate::cmp::{Compare, CompareQuery, Natural};
use crate::error::Error;
use crate::extract::SelectFirst;
use crate::ordered_core::OrderedCore;
use smallvec::Array;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Debug;
use std::iter::FromIterator;
use std::mem;
use std::ops::Range;

/// A map backed by a sorted `SmallVec`, with up to 2 entries inline.
pub type FlatMap2<K, V> = FlatMap<[(K, V); 2]>;
/// A multimap backed by a sorted `SmallVec`, with up to 2 entries inline.
pub type FlatMultiMap2<K, V> = FlatMultiMap<[(K, V); 2]>;

/// A map with unique keys kept sorted under a comparator.
pub struct FlatMap<A: Array, C = Natural>(OrderedCore<A, SelectFirst, C>);

/// A multimap: every inserted pair is kept, pairs with equivalent keys in
/// insertion order.
pub struct FlatMultiMap<A: Array, C = Natural>(OrderedCore<A, SelectFirst, C>);

/// Iterator over `(&K, &mut V)`, in key order.
pub struct IterMut<'a, K, V>(std::slice::IterMut<'a, (K, V)>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|&mut (ref k, ref mut v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|&mut (ref k, ref mut v)| (k, v))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

macro_rules! common_map_impls {
    ($name:ident) => {
        impl<K, V, A: Array<Item = (K, V)>, C> $name<A, C> {
            /// Creates an empty map ordered by `cmp`.
            pub fn with_cmp(cmp: C) -> Self {
                Self(OrderedCore::new(SelectFirst, cmp))
            }

            /// The comparator the keys are ordered by.
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

            pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
                self.0.try_reserve(additional)
            }

            pub fn shrink_to_fit(&mut self) {
                self.0.shrink_to_fit()
            }

            pub fn clear(&mut self) {
                self.0.clear()
            }

            /// The pairs in key order.
            pub fn as_slice(&self) -> &[(K, V)] {
                self.0.as_slice()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, (K, V)> {
                self.0.as_slice().iter()
            }

            pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
                IterMut(self.0.as_mut_slice().iter_mut())
            }

            pub fn keys<'a>(&'a self) -> impl Iterator<Item = &'a K> + 'a
            where
                K: 'a,
                V: 'a,
            {
                self.0.as_slice().iter().map(|(k, _)| k)
            }

            pub fn values<'a>(&'a self) -> impl Iterator<Item = &'a V> + 'a
            where
                K: 'a,
                V: 'a,
            {
                self.0.as_slice().iter().map(|(_, v)| v)
            }

            pub fn values_mut<'a>(&'a mut self) -> impl Iterator<Item = &'a mut V> + 'a
            where
                K: 'a,
                V: 'a,
            {
                self.0.as_mut_slice().iter_mut().map(|&mut (_, ref mut v)| v)
            }

            /// The pair with the smallest key.
            pub fn first(&self) -> Option<&(K, V)> {
                self.0.as_slice().first()
            }

            /// The pair with the largest key, the last equivalent in a
            /// multimap.
            pub fn last(&self) -> Option<&(K, V)> {
                self.0.as_slice().last()
            }

            /// The pair at a position in key order.
            pub fn get_index(&self, index: usize) -> Option<&(K, V)> {
                self.0.get(index)
            }

            /// Removes and returns the pair at `index`.
            ///
            /// Panics when `index` is out of range.
            pub fn remove_index(&mut self, index: usize) -> (K, V) {
                self.0.remove_at(index)
            }

            /// Removes a range of positions, yielding the pairs in key
            /// order. `drain(..)` empties the map.
            ///
            /// Panics when the range is out of bounds.
            pub fn drain<R: std::ops::RangeBounds<usize>>(
                &mut self,
                range: R,
            ) -> smallvec::Drain<'_, A> {
                self.0.drain(range)
            }

            /// Keeps only the pairs `f` approves of. Values may be mutated,
            /// keys may not.
            pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
                self.0.retain(|pair| f(&pair.0, &mut pair.1))
            }

            pub fn into_vec(self) -> Vec<(K, V)> {
                self.0.into_vec()
            }

            /// Moves the contents out, leaving an empty map with the same
            /// comparator behind.
            pub fn take(&mut self) -> Self
            where
                C: Clone,
            {
                mem::replace(self, Self::with_cmp(self.0.cmp().clone()))
            }
        }

        impl<K, V, A: Array<Item = (K, V)>, C: Default> $name<A, C> {
            pub fn new() -> Self {
                Self::with_cmp(C::default())
            }

            pub fn with_capacity(capacity: usize) -> Self {
                Self::with_capacity_and_cmp(capacity, C::default())
            }
        }

        impl<K, V, A: Array<Item = (K, V)>, C> $name<A, C> {
            pub fn with_capacity_and_cmp(capacity: usize, cmp: C) -> Self {
                Self(OrderedCore::with_capacity(SelectFirst, cmp, capacity))
            }

            /// Exchanges the contents of two maps, comparators included.
            pub fn swap(&mut self, other: &mut Self) {
                mem::swap(self, other)
            }
        }

        impl<K, V, A: Array<Item = (K, V)>, C: Compare<K>> $name<A, C> {
            pub fn lower_bound(&self, key: &K) -> usize {
                self.0.lower_bound(key)
            }

            pub fn upper_bound(&self, key: &K) -> usize {
                self.0.upper_bound(key)
            }

            pub fn equal_range(&self, key: &K) -> Range<usize> {
                self.0.equal_range(key)
            }

            /// The position of the first pair with a key equivalent to `key`.
            pub fn find(&self, key: &K) -> Option<usize> {
                self.0.find(key)
            }

            pub fn count(&self, key: &K) -> usize {
                self.0.count(key)
            }

            pub fn contains(&self, key: &K) -> bool {
                self.0.contains(key)
            }

            /// The value stored under `key`, the first one in a multimap.
            pub fn get<'a>(&'a self, key: &K) -> Option<&'a V>
            where
                K: 'a,
                V: 'a,
            {
                match self.0.find(key) {
                    Some(i) => self.0.get(i).map(|pair| &pair.1),
                    None => None,
                }
            }

            pub fn get_mut<'a>(&'a mut self, key: &K) -> Option<&'a mut V>
            where
                K: 'a,
                V: 'a,
            {
                match self.0.find(key) {
                    Some(i) => Some(&mut self.0.as_mut_slice()[i].1),
                    None => None,
                }
            }

            pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
                match self.0.find(key) {
                    Some(i) => self.0.get(i).map(|pair| (&pair.0, &pair.1)),
                    None => None,
                }
            }

            /// Checked access, [`Error::KeyNotFound`] when absent.
            pub fn at<'a>(&'a self, key: &K) -> Result<&'a V, Error>
            where
                K: 'a,
                V: 'a,
            {
                self.get(key).ok_or(Error::KeyNotFound)
            }

            pub fn at_mut<'a>(&'a mut self, key: &K) -> Result<&'a mut V, Error>
            where
                K: 'a,
                V: 'a,
            {
                self.get_mut(key).ok_or(Error::KeyNotFound)
            }

            /// The pair order induced by the key comparator; values never
            /// participate.
            pub fn value_comp(&self) -> impl Fn(&(K, V), &(K, V)) -> bool + '_ {
                move |a, b| self.0.value_less(a, b)
            }
        }

        // Transparent lookup, available per query type the comparator
        // implements `CompareQuery` for.
        impl<K, V, A: Array<Item = (K, V)>, C: Compare<K>> $name<A, C> {
            pub fn lower_bound_by<Q: ?Sized>(&self, query: &Q) -> usize
            where
                C: CompareQuery<K, Q>,
            {
                self.0.lower_bound_by(query)
            }

            pub fn upper_bound_by<Q: ?Sized>(&self, query: &Q) -> usize
            where
                C: CompareQuery<K, Q>,
            {
                self.0.upper_bound_by(query)
            }

            pub fn equal_range_by<Q: ?Sized>(&self, query: &Q) -> Range<usize>
            where
                C: CompareQuery<K, Q>,
            {
                self.0.equal_range_by(query)
            }

            pub fn find_by<Q: ?Sized>(&self, query: &Q) -> Option<usize>
            where
                C: CompareQuery<K, Q>,
            {
                self.0.find_by(query)
            }

            pub fn count_by<Q: ?Sized>(&self, query: &Q) -> usize
            where
                C: CompareQuery<K, Q>,
            {
                self.0.count_by(query)
            }

            pub fn contains_by<Q: ?Sized>(&self, query: &Q) -> bool
            where
                C: CompareQuery<K, Q>,
            {
                self.0.contains_by(query)
            }

            pub fn get_by<'a, Q: ?Sized>(&'a self, query: &Q) -> Option<&'a V>
            where
                C: CompareQuery<K, Q>,
                K: 'a,
                V: 'a,
            {
                match self.0.find_by(query) {
                    Some(i) => self.0.get(i).map(|pair| &pair.1),
                    None => None,
                }
            }

            pub fn get_mut_by<'a, Q: ?Sized>(&'a mut self, query: &Q) -> Option<&'a mut V>
            where
                C: CompareQuery<K, Q>,
                K: 'a,
                V: 'a,
            {
                match self.0.find_by(query) {
                    Some(i) => Some(&mut self.0.as_mut_slice()[i].1),
                    None => None,
                }
            }
        }

        impl<K: Clone, V: Clone, A: Array<Item = (K, V)>, C: Clone> Clone for $name<A, C> {
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl<K, V, A: Array<Item = (K, V)>, C: Default> Default for $name<A, C> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<K: Debug, V: Debug, A: Array<Item = (K, V)>, C> Debug for $name<A, C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map()
                    .entries(self.iter().map(|(k, v)| (k, v)))
                    .finish()
            }
        }

        // Equality is elementwise key equivalence and comparison is
        // lexicographic over keys; values never participate, which is why
        // `Eq` and `Ord` are absent. Compare `as_slice()` to take values
        // into account.
        impl<K, V, A: Array<Item = (K, V)>, C: Compare<K>> PartialEq for $name<A, C> {
            fn eq(&self, other: &Self) -> bool {
                self.0.equiv_elements(&other.0)
            }
        }

        impl<K, V, A: Array<Item = (K, V)>, C: Compare<K>> PartialOrd for $name<A, C> {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.0.lex_cmp(&other.0))
            }
        }

        impl<'a, K: 'a, V: 'a, A: Array<Item = (K, V)>, C> IntoIterator for &'a $name<A, C> {
            type Item = &'a (K, V);
            type IntoIter = std::slice::Iter<'a, (K, V)>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<K, V, A: Array<Item = (K, V)>, C> IntoIterator for $name<A, C> {
            type Item = (K, V);
            type IntoIter = smallvec::IntoIter<A>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_inner().into_iter()
            }
        }

        impl<K, V, A, C> FromIterator<(K, V)> for $name<A, C>
        where
            A: Array<Item = (K, V)>,
            C: Compare<K> + Default,
        {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut res = Self::new();
                res.extend(iter);
                res
            }
        }

        impl<K, V, A, C> From<Vec<(K, V)>> for $name<A, C>
        where
            A: Array<Item = (K, V)>,
            C: Compare<K> + Default,
        {
            fn from(vec: Vec<(K, V)>) -> Self {
                vec.into_iter().collect()
            }
        }
    };
}

common_map_impls!(FlatMap);
common_map_impls!(FlatMultiMap);

impl<K, V, A: Array<Item = (K, V)>, C: Compare<K>> FlatMap<A, C> {
    /// Inserts or assigns. Returns the value previously stored under an
    /// equivalent key, which keeps its original key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let slot = self.0.unique_slot(&key);
        match slot {
            Ok(pos) => {
                self.0.insert_at(pos, (key, value));
                None
            }
            Err(pos) => Some(mem::replace(&mut self.0.as_mut_slice()[pos].1, value)),
        }
    }

    /// [`insert`](Self::insert) with a position hint, typically `len()`
    /// when building from key-sorted input.
    ///
    /// Panics when `hint > len()`.
    pub fn insert_hint(&mut self, hint: usize, key: K, value: V) -> Option<V> {
        let slot = self.0.unique_slot_hint(hint, &key);
        match slot {
            Ok(pos) => {
                self.0.insert_at(pos, (key, value));
                None
            }
            Err(pos) => Some(mem::replace(&mut self.0.as_mut_slice()[pos].1, value)),
        }
    }

    /// Inserts `f()` under `key` unless the key is present. The value is
    /// only constructed on insertion. Returns the pair's position and
    /// whether it was inserted.
    pub fn try_insert_with(&mut self, key: K, f: impl FnOnce() -> V) -> (usize, bool) {
        let slot = self.0.unique_slot(&key);
        match slot {
            Ok(pos) => {
                self.0.insert_at(pos, (key, f()));
                (pos, true)
            }
            Err(pos) => (pos, false),
        }
    }

    /// Hinted [`try_insert_with`](Self::try_insert_with).
    ///
    /// Panics when `hint > len()`.
    pub fn try_insert_with_hint(
        &mut self,
        hint: usize,
        key: K,
        f: impl FnOnce() -> V,
    ) -> (usize, bool) {
        let slot = self.0.unique_slot_hint(hint, &key);
        match slot {
            Ok(pos) => {
                self.0.insert_at(pos, (key, f()));
                (pos, true)
            }
            Err(pos) => (pos, false),
        }
    }

    /// The value under `key`, inserting `f()` first when absent.
    pub fn get_or_insert_with<'a>(&'a mut self, key: K, f: impl FnOnce() -> V) -> &'a mut V
    where
        K: 'a,
        V: 'a,
    {
        let (pos, _) = self.try_insert_with(key, f);
        &mut self.0.as_mut_slice()[pos].1
    }

    /// The value under `key`, inserting the default first when absent.
    pub fn get_or_default<'a>(&'a mut self, key: K) -> &'a mut V
    where
        V: Default,
        K: 'a,
        V: 'a,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Removes the pair stored under `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.0.find(key).map(|i| self.0.remove_at(i).1)
    }

    pub fn remove_by<Q: ?Sized>(&mut self, query: &Q) -> Option<V>
    where
        C: CompareQuery<K, Q>,
    {
        self.0.find_by(query).map(|i| self.0.remove_at(i).1)
    }
}

impl<K, V, A: Array<Item = (K, V)>, C: Compare<K>> Extend<(K, V)> for FlatMap<A, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert_hint(self.len(), key, value);
        }
    }
}

impl<K: Ord, V, A: Array<Item = (K, V)>> From<BTreeMap<K, V>> for FlatMap<A, Natural> {
    fn from(value: BTreeMap<K, V>) -> Self {
        // already key-sorted, so the hinted path is linear
        let mut res = Self::new();
        res.extend(value);
        res
    }
}

impl<K, V, A: Array<Item = (K, V)>, C: Compare<K>> FlatMultiMap<A, C> {
    /// Inserts the pair after all pairs with equivalent keys. Returns its
    /// position.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        self.0.insert_stable((key, value))
    }

    /// Hinted insertion. Insertion order of equivalent keys is preserved
    /// no matter what the hint is.
    ///
    /// Panics when `hint > len()`.
    pub fn insert_hint(&mut self, hint: usize, key: K, value: V) -> usize {
        self.0.insert_stable_hint(hint, (key, value))
    }

    /// Removes every pair with a key equivalent to `key`, returning how
    /// many were removed.
    pub fn remove(&mut self, key: &K) -> usize {
        self.0.remove_key(key)
    }

    pub fn remove_by<Q: ?Sized>(&mut self, query: &Q) -> usize
    where
        C: CompareQuery<K, Q>,
    {
        self.0.remove_key_by(query)
    }

    /// All pairs with keys equivalent to `key`, in insertion order.
    pub fn get_all(&self, key: &K) -> &[(K, V)] {
        &self.0.as_slice()[self.0.equal_range(key)]
    }
}

impl<K, V, A: Array<Item = (K, V)>, C: Compare<K>> Extend<(K, V)> for FlatMultiMap<A, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0.extend_stable(iter)
    }
}

impl<K: Ord, V, A: Array<Item = (K, V)>> From<BTreeMap<K, V>> for FlatMultiMap<A, Natural> {
    fn from(value: BTreeMap<K, V>) -> Self {
        let mut res = Self::new();
        res.extend(value);
        res
    }
}

#[cfg(feature = "serde")]
impl<K, V, A, C> serde::Serialize for FlatMap<A, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
    A: Array<Item = (K, V)>,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(k, v)| (k, v)))
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, A, C> serde::Deserialize<'de> for FlatMap<A, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    A: Array<Item = (K, V)>,
    C: Compare<K> + Default,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<A, C>(std::marker::PhantomData<(A, C)>);

        impl<'de, K, V, A, C> serde::de::Visitor<'de> for MapVisitor<A, C>
        where
            K: serde::Deserialize<'de>,
            V: serde::Deserialize<'de>,
            A: Array<Item = (K, V)>,
            C: Compare<K> + Default,
        {
            type Value = FlatMap<A, C>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<M: serde::de::MapAccess<'de>>(
                self,
                mut map: M,
            ) -> Result<Self::Value, M::Error> {
                let mut res = FlatMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry()? {
                    res.insert(key, value);
                }
                Ok(res)
            }
        }

        deserializer.deserialize_map(MapVisitor(std::marker::PhantomData))
    }
}

#[cfg(feature = "serde")]
impl<K, V, A, C> serde::Serialize for FlatMultiMap<A, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
    A: Array<Item = (K, V)>,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // a multimap is not a JSON-style map, duplicate keys would be lost
        serializer.collect_seq(self.as_slice())
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, A, C> serde::Deserialize<'de> for FlatMultiMap<A, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    A: Array<Item = (K, V)>,
    C: Compare<K> + Default,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeqVisitor<A, C>(std::marker::PhantomData<(A, C)>);

        impl<'de, K, V, A, C> serde::de::Visitor<'de> for SeqVisitor<A, C>
        where
            K: serde::Deserialize<'de>,
            V: serde::Deserialize<'de>,
            A: Array<Item = (K, V)>,
            C: Compare<K> + Default,
        {
            type Value = FlatMultiMap<A, C>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence of pairs")
            }

            fn visit_seq<S: serde::de::SeqAccess<'de>>(
                self,
                mut seq: S,
            ) -> Result<Self::Value, S::Error> {
                let mut res = FlatMultiMap::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some((key, value)) = seq.next_element()? {
                    res.insert(key, value);
                }
                Ok(res)
            }
        }

        deserializer.deserialize_seq(SeqVisitor(std::marker::PhantomData))
    }
}
