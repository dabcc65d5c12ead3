//! Comparator traits for the sorted containers.
//!
//! A comparator is a strict weak order over keys. Two keys are *equivalent*
//! when neither is ordered before the other; this is the only notion of
//! equality the containers consult, `==` on keys is never used.
use std::borrow::Borrow;

/// A strict weak order over `K`.
///
/// `less` must be irreflexive and transitive, and the induced equivalence
/// (`!less(a, b) && !less(b, a)`) must be transitive as well. Containers
/// ordered by a comparator that violates this are in an unspecified (but
/// memory-safe) state.
pub trait Compare<K: ?Sized> {
    /// Is `a` ordered strictly before `b`?
    fn less(&self, a: &K, b: &K) -> bool;

    /// Are `a` and `b` equivalent under this order?
    fn equiv(&self, a: &K, b: &K) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// Opt-in heterogeneous comparison of keys against a query type `Q`.
///
/// Implementing this trait is what makes a comparator *transparent* over
/// `Q`: the `_by` lookup methods on the containers become available for
/// `&Q` arguments, so e.g. a `String`-keyed set can be probed with a
/// `&str` without allocating a key.
pub trait CompareQuery<K: ?Sized, Q: ?Sized>: Compare<K> {
    /// Is the stored key `key` ordered before the query?
    fn less_key(&self, key: &K, query: &Q) -> bool;

    /// Is the query ordered before the stored key `key`?
    fn less_query(&self, query: &Q, key: &K) -> bool;

    /// Is `key` equivalent to the query?
    fn equiv_query(&self, key: &K, query: &Q) -> bool {
        !self.less_key(key, query) && !self.less_query(query, key)
    }
}

/// The natural order of a key type, i.e. its `Ord` instance.
///
/// `Natural` is transparent over every `Q` the key can be borrowed as,
/// which gives the usual `String`/`str` and `Vec<T>`/`[T]` lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }

    fn equiv(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

impl<K, Q> CompareQuery<K, Q> for Natural
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    fn less_key(&self, key: &K, query: &Q) -> bool {
        key.borrow() < query
    }

    fn less_query(&self, query: &Q, key: &K) -> bool {
        query < key.borrow()
    }

    fn equiv_query(&self, key: &K, query: &Q) -> bool {
        key.borrow() == query
    }
}

/// The reverse of the natural order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reverse;

impl<K: Ord + ?Sized> Compare<K> for Reverse {
    fn less(&self, a: &K, b: &K) -> bool {
        b < a
    }

    fn equiv(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_is_ord() {
        assert!(Natural.less(&1, &2));
        assert!(!Natural.less(&2, &1));
        assert!(Natural.equiv(&3, &3));
        assert!(!Natural.equiv(&3, &4));
    }

    #[test]
    fn natural_is_transparent_over_str() {
        let key = "foo".to_string();
        assert!(CompareQuery::<String, str>::equiv_query(&Natural, &key, "foo"));
        assert!(CompareQuery::<String, str>::less_key(&Natural, &key, "zzz"));
        assert!(CompareQuery::<String, str>::less_query(&Natural, "bar", &key));
    }

    #[test]
    fn reverse_flips() {
        assert!(Reverse.less(&2, &1));
        assert!(!Reverse.less(&1, &2));
        assert!(Reverse.equiv(&1, &1));
    }
}
