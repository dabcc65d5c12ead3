//! Binary-heap operations on slices.
//!
//! Max-heap convention: for every parent/child edge, the child is not
//! ordered after the parent. `less` is a strict weak order; the `_by`-less
//! wrappers use the natural order of the elements.

/// Rearranges the slice into a max-heap.
pub fn make_heap<T: Ord>(data: &mut [T]) {
    make_heap_by(data, |a, b| a < b)
}

/// Rearranges the slice into a max-heap under `less`.
pub fn make_heap_by<T>(data: &mut [T], mut less: impl FnMut(&T, &T) -> bool) {
    for parent in (0..data.len() / 2).rev() {
        sift_down(data, parent, &mut less);
    }
}

/// Pushes `data[len - 1]` onto the heap `data[..len - 1]`.
///
/// The slice must be non-empty and its prefix already a heap.
pub fn push_heap<T: Ord>(data: &mut [T]) {
    push_heap_by(data, |a, b| a < b)
}

/// `push_heap` under `less`.
pub fn push_heap_by<T>(data: &mut [T], mut less: impl FnMut(&T, &T) -> bool) {
    assert!(!data.is_empty());
    sift_up(data, data.len() - 1, &mut less);
}

/// Swaps the front of the heap with the last element and restores the heap
/// property on the remaining prefix, leaving the popped maximum at the end.
pub fn pop_heap<T: Ord>(data: &mut [T]) {
    pop_heap_by(data, |a, b| a < b)
}

/// `pop_heap` under `less`.
pub fn pop_heap_by<T>(data: &mut [T], mut less: impl FnMut(&T, &T) -> bool) {
    assert!(!data.is_empty());
    let last = data.len() - 1;
    if last == 0 {
        return;
    }
    data.swap(0, last);
    make_heap_by(&mut data[..last], &mut less);
}

/// Is the slice a max-heap under `less`?
pub fn is_heap_by<T>(data: &[T], mut less: impl FnMut(&T, &T) -> bool) -> bool {
    (1..data.len()).all(|child| !less(&data[(child - 1) / 2], &data[child]))
}

fn sift_up<T>(data: &mut [T], mut idx: usize, less: &mut impl FnMut(&T, &T) -> bool) {
    while idx > 0 && less(&data[(idx - 1) / 2], &data[idx]) {
        data.swap((idx - 1) / 2, idx);
        idx = (idx - 1) / 2;
    }
}

fn sift_down<T>(data: &mut [T], mut parent: usize, less: &mut impl FnMut(&T, &T) -> bool) {
    let len = data.len();
    loop {
        let mut child = 2 * parent + 1;
        if child >= len {
            break;
        }
        if child + 1 < len && less(&data[child], &data[child + 1]) {
            child += 1;
        }
        if less(&data[parent], &data[child]) {
            data.swap(parent, child);
            parent = child;
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    fn heap_sort(v: &mut Vec<i32>) {
        make_heap(v);
        for end in (1..=v.len()).rev() {
            pop_heap(&mut v[..end]);
        }
    }

    #[test]
    fn make_heap_small() {
        let mut v = vec![3, 1, 4, 1, 5, 9, 2, 6];
        make_heap(&mut v);
        assert!(is_heap_by(&v, |a, b| a < b));
        assert_eq!(v[0], 9);
    }

    #[test]
    fn push_heap_incremental() {
        let mut v: Vec<i32> = Vec::new();
        for x in [5, 1, 9, 3, 7].iter() {
            v.push(*x);
            push_heap(&mut v);
            assert!(is_heap_by(&v, |a, b| a < b));
        }
        assert_eq!(v[0], 9);
    }

    #[test]
    fn pop_heap_moves_max_to_end() {
        let mut v = vec![2, 8, 5, 1];
        make_heap(&mut v);
        pop_heap(&mut v);
        assert_eq!(*v.last().unwrap(), 8);
        assert!(is_heap_by(&v[..3], |a, b| a < b));
    }

    #[test]
    fn singleton_heap() {
        let mut v = vec![42];
        make_heap(&mut v);
        pop_heap(&mut v);
        push_heap(&mut v);
        assert_eq!(v, vec![42]);
    }

    #[test]
    fn custom_order() {
        // min-heap via reversed comparator
        let mut v = vec![3, 1, 4, 1, 5];
        make_heap_by(&mut v, |a, b| b < a);
        assert_eq!(v[0], 1);
        assert!(is_heap_by(&v, |a, b| b < a));
    }

    quickcheck! {
        fn make_heap_is_heap(v: Vec<i32>) -> bool {
            let mut v = v;
            make_heap(&mut v);
            is_heap_by(&v, |a, b| a < b)
        }

        fn heap_sort_sorts(v: Vec<i32>) -> bool {
            let mut expected = v.clone();
            expected.sort();
            let mut actual = v;
            heap_sort(&mut actual);
            expected == actual
        }

        fn push_heap_keeps_heap(v: Vec<i32>, x: i32) -> bool {
            let mut v = v;
            make_heap(&mut v);
            v.push(x);
            push_heap(&mut v);
            is_heap_by(&v, |a, b| a < b)
        }
    }
}
