//! Time-to-index lookup over time-ordered elements.

use super::elements::Timed;

/// Which neighbour to return when a time falls between two elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Return the element before the time (start of a range).
    Start,
    /// Return the element after the time (end of a range).
    End,
}

/// Binary search for the element containing `target`.
///
/// An exact hit returns the containing element. A miss returns the element
/// before `target` for [`SearchMode::Start`] and the element after it for
/// [`SearchMode::End`], clamped into the valid index range. Returns `0` for
/// an empty slice.
pub fn find_index<T: Timed>(items: &[T], target: f64, mode: SearchMode) -> usize {
    if items.is_empty() {
        return 0;
    }

    let mut left: isize = 0;
    let mut right: isize = items.len() as isize - 1;

    while left <= right {
        let mid = (left + right) / 2;
        let item = &items[mid as usize];
        if item.contains_time(target) {
            return mid as usize;
        } else if target > item.end_time() {
            left = mid + 1;
        } else {
            right = mid - 1;
        }
    }

    let index = match mode {
        SearchMode::Start => left - 1,
        SearchMode::End => right + 1,
    };
    index.clamp(0, items.len() as isize - 1) as usize
}
