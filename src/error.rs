//! Error type shared by the containers.

use std::error;
use std::fmt;

/// The ways a fallible container operation can fail.
///
/// Anything listed here is reported to the caller; invariant violations
/// such as out-of-range positions passed to index-taking methods are
/// programming errors and panic instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A map lookup by key found no equivalent element.
    KeyNotFound,
    /// A checked deque access was past the end.
    IndexOutOfRange { index: usize, len: usize },
    /// The underlying buffer could not be grown.
    AllocationFailure,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "no element exists with the given key"),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            Error::AllocationFailure => write!(f, "allocation failure"),
        }
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::IndexOutOfRange { index: 4, len: 2 }.to_string(),
            "index 4 out of range for length 2"
        );
        assert_eq!(Error::KeyNotFound.to_string(), "no element exists with the given key");
    }
}
