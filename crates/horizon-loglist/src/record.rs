//! Records: numbered, immutable wrappers around user log items.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A user payload shown in the log list.
///
/// The only requirement is a timestamp-like value that orders items.
pub trait LogItem: Send + Sync + 'static {
    /// The ordering key, usually a timestamp.
    type Time: Ord + Copy + fmt::Debug + Send + Sync;

    /// The item's time.
    fn time(&self) -> Self::Time;
}

/// Items that expose a single string for substring filtering.
pub trait FilterableByString {
    /// The text searched by string filters.
    fn filter_string(&self) -> Cow<'_, str>;
}

/// The sequence number of a record, assigned in append order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordNumber(pub u64);

impl RecordNumber {
    /// The first number handed out by an empty store.
    pub const FIRST: Self = Self(0);

    /// Get the raw u64 value.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// The number following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RecordNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A log item together with its sequence number.
///
/// Two records are equal iff their numbers are equal. Records sort by
/// `(time, number)`.
pub struct Record<T> {
    number: RecordNumber,
    item: Arc<T>,
}

impl<T> Record<T> {
    /// Wrap an item under the given number.
    pub fn new(number: RecordNumber, item: T) -> Self {
        Self {
            number,
            item: Arc::new(item),
        }
    }

    /// Wrap an already shared item.
    pub fn from_arc(number: RecordNumber, item: Arc<T>) -> Self {
        Self { number, item }
    }

    /// The record's number.
    pub fn number(&self) -> RecordNumber {
        self.number
    }

    /// The wrapped item.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// The shared handle to the wrapped item.
    pub fn item_arc(&self) -> &Arc<T> {
        &self.item
    }
}

impl<T: LogItem> Record<T> {
    /// The item's time.
    pub fn time(&self) -> T::Time {
        self.item.time()
    }

    /// The total order used by the reconciler: time, then number.
    pub fn sort_key(&self) -> (T::Time, RecordNumber) {
        (self.item.time(), self.number)
    }
}

impl<T> Clone for Record<T> {
    fn clone(&self) -> Self {
        Self {
            number: self.number,
            item: Arc::clone(&self.item),
        }
    }
}

impl<T> PartialEq for Record<T> {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl<T> Eq for Record<T> {}

impl<T> Hash for Record<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("number", &self.number)
            .field("item", &self.item)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.number, self.item)
    }
}
