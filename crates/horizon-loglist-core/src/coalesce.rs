//! Latest-value coalescing.
//!
//! High-frequency streams such as the filtered-set size only matter at their
//! most recent value. [`Latest<T>`] keeps one pending slot: producers
//! overwrite it, the consumer takes it. Values equal to the last one taken
//! are suppressed.

use std::sync::Arc;

use parking_lot::Mutex;

struct LatestState<T> {
    pending: Option<T>,
    delivered: Option<T>,
}

/// A shared "distinct by latest" cell.
///
/// Clones share the same slot, so one clone can live in a producer-side
/// slot closure while another sits with the consumer.
pub struct Latest<T> {
    state: Arc<Mutex<LatestState<T>>>,
}

impl<T> Clone for Latest<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + PartialEq> Latest<T> {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LatestState {
                pending: None,
                delivered: None,
            })),
        }
    }

    /// Store a value, replacing any value not yet taken.
    ///
    /// Returns `true` when the slot was empty, meaning the consumer needs a
    /// wake-up; `false` when an earlier wake-up is still outstanding.
    pub fn offer(&self, value: T) -> bool {
        self.state.lock().pending.replace(value).is_none()
    }

    /// Take the pending value unless it equals the last value taken.
    pub fn take(&self) -> Option<T> {
        let mut state = self.state.lock();
        let value = state.pending.take()?;
        if state.delivered.as_ref() == Some(&value) {
            return None;
        }
        state.delivered = Some(value.clone());
        Some(value)
    }

    /// The last value handed to the consumer.
    pub fn last_delivered(&self) -> Option<T> {
        self.state.lock().delivered.clone()
    }

    /// Forget the last delivered value so the next one is always delivered.
    pub fn reset(&self) {
        self.state.lock().delivered = None;
    }
}

impl<T: Clone + PartialEq> Default for Latest<T> {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(Latest<usize>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_is_delivered() {
        let latest = Latest::new();
        assert!(latest.offer(1));
        assert!(!latest.offer(2));
        assert!(!latest.offer(3));

        assert_eq!(latest.take(), Some(3));
        assert_eq!(latest.take(), None);
    }

    #[test]
    fn test_duplicates_are_suppressed() {
        let latest = Latest::new();
        latest.offer(5);
        assert_eq!(latest.take(), Some(5));

        assert!(latest.offer(5));
        assert_eq!(latest.take(), None);

        latest.offer(6);
        assert_eq!(latest.take(), Some(6));
        assert_eq!(latest.last_delivered(), Some(6));
    }

    #[test]
    fn test_reset_allows_redelivery() {
        let latest = Latest::new();
        latest.offer(1);
        latest.take();
        latest.reset();
        latest.offer(1);
        assert_eq!(latest.take(), Some(1));
    }

    #[test]
    fn test_clones_share_slot() {
        let producer = Latest::new();
        let consumer = producer.clone();
        std::thread::spawn(move || {
            for i in 0..100 {
                producer.offer(i);
            }
        })
        .join()
        .unwrap();
        assert_eq!(consumer.take(), Some(99));
    }
}
