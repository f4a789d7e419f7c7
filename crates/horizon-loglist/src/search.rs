//! Binary search over sorted record sequences.
//!
//! The search narrows the range by bisection and then scans linearly,
//! matching elements by identity. Runs of equal keys are therefore handled:
//! the scan walks the whole run until it finds the target or passes it.
//!
//! ```
//! use horizon_loglist::search::{search_by, NotFoundPolicy};
//!
//! let seq = [1, 3, 3, 5, 8];
//! assert_eq!(search_by(&seq, &5, |x| *x, NotFoundPolicy::ReturnNone, None), Some(3));
//! assert_eq!(search_by(&seq, &4, |x| *x, NotFoundPolicy::ReturnNone, None), None);
//! assert_eq!(search_by(&seq, &4, |x| *x, NotFoundPolicy::ReturnClosestIndex, None), Some(3));
//! ```

use crate::record::{LogItem, Record, RecordNumber};

/// What to return when the target is not in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFoundPolicy {
    /// Return `None`.
    #[default]
    ReturnNone,
    /// Return the insertion point: the index of the first element whose key
    /// is greater than the target's.
    ReturnClosestIndex,
}

/// Search `seq` (sorted ascending by `key`) for `target`.
///
/// `range` is an inclusive `(start, end)` pair, clamped to the sequence.
/// Returns `None` for an empty sequence, an inverted range, or a target key
/// outside the keys at the range bounds.
pub fn search_by<X, K, F>(
    seq: &[X],
    target: &X,
    key: F,
    policy: NotFoundPolicy,
    range: Option<(usize, usize)>,
) -> Option<usize>
where
    X: PartialEq,
    K: Ord,
    F: Fn(&X) -> K,
{
    search_by_key(seq, key(target), key, |x| x == target, policy, range)
}

/// Search by a key value, matching the target with `is_target`.
///
/// This is the general form behind [`search_by`] for callers that hold only
/// the key of the element they look for.
pub fn search_by_key<X, K, F, P>(
    seq: &[X],
    target_key: K,
    key: F,
    is_target: P,
    policy: NotFoundPolicy,
    range: Option<(usize, usize)>,
) -> Option<usize>
where
    K: Ord,
    F: Fn(&X) -> K,
    P: Fn(&X) -> bool,
{
    if seq.is_empty() {
        return None;
    }

    let (mut start, range_end) = range.unwrap_or((0, seq.len() - 1));
    let range_end = range_end.min(seq.len() - 1);
    if start > range_end {
        return None;
    }

    if target_key < key(&seq[start]) || target_key > key(&seq[range_end]) {
        return None;
    }

    let mut end = range_end;
    while end - start > 2 {
        let mid = (start + end) / 2;
        if key(&seq[mid]) < target_key {
            start = mid;
        } else {
            end = mid;
        }
    }

    let mut i = start;
    while i <= range_end && key(&seq[i]) <= target_key {
        if is_target(&seq[i]) {
            return Some(i);
        }
        i += 1;
    }

    match policy {
        NotFoundPolicy::ReturnNone => None,
        NotFoundPolicy::ReturnClosestIndex => Some(i),
    }
}

/// Search records sorted by time.
pub fn search_by_time<T: LogItem>(
    seq: &[Record<T>],
    target: &Record<T>,
    policy: NotFoundPolicy,
) -> Option<usize> {
    search_by(seq, target, |r| r.time(), policy, None)
}

/// Search records sorted by number.
pub fn search_by_number<T>(
    seq: &[Record<T>],
    number: RecordNumber,
    policy: NotFoundPolicy,
) -> Option<usize> {
    search_by_key(seq, number, |r| r.number(), |r| r.number() == number, policy, None)
}
