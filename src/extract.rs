//! Key extraction: maps a stored element to the key it is ordered by.

/// Extracts the ordering key from a stored value.
///
/// Sets store bare keys and use [`Identity`]; maps store `(key, value)`
/// pairs and use [`SelectFirst`].
pub trait ExtractKey<V> {
    type Key;

    fn key<'a>(&self, value: &'a V) -> &'a Self::Key;
}

/// The value is its own key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<T> ExtractKey<T> for Identity {
    type Key = T;

    fn key<'a>(&self, value: &'a T) -> &'a T {
        value
    }
}

/// The first component of a pair is the key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectFirst;

impl<K, V> ExtractKey<(K, V)> for SelectFirst {
    type Key = K;

    fn key<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_value() {
        assert_eq!(*Identity.key(&7), 7);
    }

    #[test]
    fn select_first_returns_key() {
        assert_eq!(*SelectFirst.key(&(1, "one")), 1);
    }
}
