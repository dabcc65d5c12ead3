//! Sorted-vector collections.
//!
//! Sets and maps stored as sorted `SmallVec`s ([`FlatSet`], [`FlatMap`]
//! and their duplicate-keeping variants), a ring-buffer deque
//! ([`RingDeque`]) with a FIFO [`Queue`] adaptor, and the binary search
//! and heap slice routines the containers are built on.
//!
//! All ordering goes through a comparator value, a strict weak order over
//! keys. The default [`Natural`] comparator uses `Ord` and supports
//! transparent lookup through `Borrow`, so a `FlatSet2<String>` can be
//! probed with a `&str`.

mod cmp;
mod error;
mod extract;
mod ordered_core;

pub mod flat_map;
pub mod flat_set;
pub mod heap;
pub mod queue;
pub mod ring_deque;
pub mod search;

pub use cmp::{Compare, CompareQuery, Natural, Reverse};
pub use error::Error;
pub use extract::{ExtractKey, Identity, SelectFirst};
pub use flat_map::{FlatMap, FlatMap2, FlatMultiMap, FlatMultiMap2};
pub use flat_set::{FlatMultiSet, FlatMultiSet2, FlatSet, FlatSet2};
pub use queue::Queue;
pub use ring_deque::RingDeque;
