use std::any::Any;
use std::fmt;

use super::{is_empty_filter, Filter};

/// Accepts every item.
///
/// The empty filter only refines another empty filter: everything else may
/// reject items it accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyFilter;

impl<T: 'static> Filter<T> for EmptyFilter {
    fn check(&self, _item: &T) -> bool {
        true
    }

    fn is_sub_filter_for(&self, other: &dyn Filter<T>) -> bool {
        is_empty_filter(other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for EmptyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Empty Filter")
    }
}
