//! Search over contiguous element slices.
//!
//! Both functions take the comparison explicitly so they serve the array
//! engine and any consumer holding a plain slice.

use std::cmp::Ordering;

/// Index of the first element comparing equal to `key`.
///
/// `compare` is called as `compare(element, key)`. O(n); correct for any
/// ordering of `items`.
pub fn linear_search<T>(
    items: &[T],
    key: &T,
    mut compare: impl FnMut(&T, &T) -> Ordering,
) -> Option<usize> {
    items
        .iter()
        .position(|item| compare(item, key) == Ordering::Equal)
}

/// Index of an element comparing equal to `key`, by halving `[0, len)`.
///
/// `items` must already be sorted ascending under `compare`; this is not
/// checked, and an unsorted slice gives an unspecified answer. When
/// several elements compare equal, any one of them may be returned.
/// O(log n).
pub fn binary_search<T>(
    items: &[T],
    key: &T,
    mut compare: impl FnMut(&T, &T) -> Ordering,
) -> Option<usize> {
    let mut lo = 0;
    let mut hi = items.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match compare(&items[mid], key) {
            Ordering::Greater => hi = mid,
            Ordering::Less => lo = mid + 1,
            Ordering::Equal => return Some(mid),
        }
    }
    None
}
