//! Binary search over sorted slices, parameterised by a strict weak order.
//!
//! These are the leaf routines the ordered containers are built on, but
//! they are useful on their own for any slice sorted by a caller-supplied
//! order. They perform O(log n) comparisons, never allocate, and return
//! indices rather than references so the result can be used for insertion.
//!
//! The `_by` variants take the order as closures: `before(elem, key)`
//! answers "is this element ordered before the key", `after(key, elem)`
//! answers "is the key ordered before this element". Splitting the two
//! directions is what allows the key to be of a different type than the
//! elements (transparent lookup).

use std::ops::Range;

/// First index whose element is not ordered before `key`.
pub fn lower_bound<T: Ord>(items: &[T], key: &T) -> usize {
    lower_bound_by(items, key, |a, b| a < b)
}

/// First index whose element is not ordered before `key`, under `before`.
pub fn lower_bound_by<T, K: ?Sized>(
    items: &[T],
    key: &K,
    mut before: impl FnMut(&T, &K) -> bool,
) -> usize {
    let mut base = 0;
    let mut len = items.len();
    while len > 0 {
        let step = len / 2;
        let mid = base + step;
        if before(&items[mid], key) {
            base = mid + 1;
            len -= step + 1;
        } else {
            len = step;
        }
    }
    base
}

/// First index whose element the `key` is ordered before.
pub fn upper_bound<T: Ord>(items: &[T], key: &T) -> usize {
    upper_bound_by(items, key, |a, b| a < b)
}

/// First index whose element the `key` is ordered before, under `after`.
pub fn upper_bound_by<T, K: ?Sized>(
    items: &[T],
    key: &K,
    mut after: impl FnMut(&K, &T) -> bool,
) -> usize {
    let mut base = 0;
    let mut len = items.len();
    while len > 0 {
        let step = len / 2;
        let mid = base + step;
        if !after(key, &items[mid]) {
            base = mid + 1;
            len -= step + 1;
        } else {
            len = step;
        }
    }
    base
}

/// The half-open index range of elements equivalent to `key`.
pub fn equal_range<T: Ord>(items: &[T], key: &T) -> Range<usize> {
    lower_bound(items, key)..upper_bound(items, key)
}

/// The half-open index range of elements equivalent to `key` under the
/// given order.
pub fn equal_range_by<T, K: ?Sized>(
    items: &[T],
    key: &K,
    before: impl FnMut(&T, &K) -> bool,
    after: impl FnMut(&K, &T) -> bool,
) -> Range<usize> {
    lower_bound_by(items, key, before)..upper_bound_by(items, key, after)
}

/// Does the sorted slice contain an element equivalent to `key`?
pub fn contains<T: Ord>(items: &[T], key: &T) -> bool {
    contains_by(items, key, |a, b| a < b, |a, b| a < b)
}

/// Membership under the given order.
pub fn contains_by<T, K: ?Sized>(
    items: &[T],
    key: &K,
    before: impl FnMut(&T, &K) -> bool,
    mut after: impl FnMut(&K, &T) -> bool,
) -> bool {
    let lower = lower_bound_by(items, key, before);
    lower != items.len() && !after(key, &items[lower])
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn bounds_on_small_slices() {
        let items = [1, 2, 2, 2, 3, 5];
        assert_eq!(lower_bound(&items, &2), 1);
        assert_eq!(upper_bound(&items, &2), 4);
        assert_eq!(equal_range(&items, &2), 1..4);
        assert_eq!(lower_bound(&items, &4), 5);
        assert_eq!(upper_bound(&items, &4), 5);
        assert_eq!(lower_bound(&items, &0), 0);
        assert_eq!(upper_bound(&items, &9), 6);
        assert!(contains(&items, &5));
        assert!(!contains(&items, &4));
    }

    #[test]
    fn empty_slice() {
        let items: [i32; 0] = [];
        assert_eq!(lower_bound(&items, &1), 0);
        assert_eq!(upper_bound(&items, &1), 0);
        assert!(!contains(&items, &1));
    }

    #[test]
    fn heterogeneous_key() {
        let items = ["ant".to_string(), "bee".to_string(), "cat".to_string()];
        let i = lower_bound_by(&items, "bee", |a, b| a.as_str() < b);
        assert_eq!(i, 1);
        assert!(contains_by(
            &items,
            "cat",
            |a, b| a.as_str() < b,
            |a, b| a < b.as_str()
        ));
    }

    quickcheck! {
        fn lower_bound_partitions(v: Vec<i32>, key: i32) -> bool {
            let mut v = v;
            v.sort();
            let i = lower_bound(&v, &key);
            v[..i].iter().all(|x| *x < key) && v[i..].iter().all(|x| *x >= key)
        }

        fn upper_bound_partitions(v: Vec<i32>, key: i32) -> bool {
            let mut v = v;
            v.sort();
            let i = upper_bound(&v, &key);
            v[..i].iter().all(|x| *x <= key) && v[i..].iter().all(|x| *x > key)
        }

        fn contains_matches_std(v: Vec<i32>, key: i32) -> bool {
            let mut v = v;
            v.sort();
            contains(&v, &key) == v.binary_search(&key).is_ok()
        }
    }
}
