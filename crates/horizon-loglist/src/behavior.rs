//! Scrolling behaviors: where the window goes after a mutation.

use crate::record::Record;
use crate::search::{search_by_number, NotFoundPolicy};
use crate::window::ViewWindow;

/// Strategy for the new window offset after an append or a filter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollingBehavior {
    /// Keep the reader where they are.
    #[default]
    PreservePosition,
    /// Follow the tail of the log.
    ScrollToNew,
}

impl ScrollingBehavior {
    /// Offset after `appended` records were added at `insertion_index`.
    pub fn append_offset(self, appended: usize, insertion_index: usize, window: ViewWindow) -> usize {
        match self {
            Self::PreservePosition => window.offset,
            Self::ScrollToNew => (insertion_index + appended).saturating_sub(window.size),
        }
    }

    /// Offset after the filtered set changed from `old` to `new`.
    pub fn filter_offset<T>(self, old: &[Record<T>], new: &[Record<T>], window: ViewWindow) -> usize {
        match self {
            Self::PreservePosition => preserved_offset(old, new, window),
            Self::ScrollToNew => new.len().saturating_sub(window.size),
        }
    }
}

/// Keep the record at the middle of the old window in the middle of the new one.
fn preserved_offset<T>(old: &[Record<T>], new: &[Record<T>], window: ViewWindow) -> usize {
    if old.is_empty() || new.is_empty() {
        return 0;
    }

    let anchor_index = (window.offset + window.size / 2).min(old.len() - 1);
    let anchor = old[anchor_index].number();
    // An anchor outside the new key range falls back to the top.
    search_by_number(new, anchor, NotFoundPolicy::ReturnClosestIndex)
        .map_or(0, |found| found.saturating_sub(window.size / 2))
}
