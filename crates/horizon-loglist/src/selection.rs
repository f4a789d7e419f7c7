//! Selected-record bookkeeping.
//!
//! The selection is a set of record numbers kept in number order. It lives
//! inside the store's state so that range extension can walk the filtered
//! set under the same lock.

use std::collections::BTreeSet;

use crate::record::{Record, RecordNumber};
use crate::search::{search_by_number, NotFoundPolicy};

/// A set of selected records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<RecordNumber>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Number of selected records.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether `number` is selected.
    pub fn contains(&self, number: RecordNumber) -> bool {
        self.selected.contains(&number)
    }

    /// The selected numbers in ascending order.
    pub fn to_vec(&self) -> Vec<RecordNumber> {
        self.selected.iter().copied().collect()
    }

    /// Add `number` if absent, remove it if present.
    pub fn toggle(&mut self, number: RecordNumber) {
        if !self.selected.remove(&number) {
            self.selected.insert(number);
        }
    }

    /// Replace the selection with `number`. Returns whether it changed.
    pub fn select(&mut self, number: RecordNumber) -> bool {
        if self.selected.len() == 1 && self.selected.contains(&number) {
            return false;
        }
        self.selected.clear();
        self.selected.insert(number);
        true
    }

    /// Empty the selection. Returns whether it changed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Extend the selection towards `to` along `filtered`.
    ///
    /// Below the current minimum, records from the closest index of `to` up
    /// to (excluding) the minimum are added. Above the current maximum,
    /// records from the maximum up to and including `to` are added.
    /// Returns whether anything was added.
    pub fn extend_to<T>(&mut self, to: RecordNumber, filtered: &[Record<T>]) -> bool {
        let (Some(&min), Some(&max)) = (self.selected.first(), self.selected.last()) else {
            return false;
        };

        let before = self.selected.len();
        if to < min {
            let from = closest_index(filtered, to);
            self.selected.extend(
                filtered[from..]
                    .iter()
                    .map(Record::number)
                    .take_while(|&n| n < min),
            );
        } else if to > max {
            let from = closest_index(filtered, max);
            self.selected.extend(
                filtered[from..]
                    .iter()
                    .map(Record::number)
                    .take_while(|&n| n <= to),
            );
        }
        self.selected.len() != before
    }
}

/// Index of `number` in `filtered`, or where it would be inserted.
pub(crate) fn closest_index<T>(filtered: &[Record<T>], number: RecordNumber) -> usize {
    search_by_number(filtered, number, NotFoundPolicy::ReturnClosestIndex).unwrap_or_else(|| {
        match filtered.first() {
            Some(first) if number < first.number() => 0,
            _ => filtered.len(),
        }
    })
}
