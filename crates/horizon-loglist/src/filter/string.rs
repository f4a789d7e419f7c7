use std::any::Any;
use std::fmt;

use super::{is_empty_filter, is_same_instance, Filter, StringComparison};
use crate::record::FilterableByString;

/// Substring match against an item's [`FilterableByString::filter_string`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringFilter {
    request: String,
    comparison: StringComparison,
    normalized: String,
}

impl StringFilter {
    /// Create a filter for `request`.
    pub fn new(request: impl Into<String>, comparison: StringComparison) -> Self {
        let request = request.into();
        let normalized = comparison.normalize(&request);
        Self {
            request,
            comparison,
            normalized,
        }
    }

    /// The text searched for.
    pub fn request(&self) -> &str {
        &self.request
    }

    /// The comparison mode.
    pub fn comparison(&self) -> StringComparison {
        self.comparison
    }

    /// Whether our request, under our comparison, contains `other`'s.
    pub(crate) fn narrows(&self, other: &StringFilter) -> bool {
        other.comparison == self.comparison && self.normalized.contains(&other.normalized)
    }
}

impl<T: FilterableByString + 'static> Filter<T> for StringFilter {
    fn check(&self, item: &T) -> bool {
        self.comparison
            .contains(&item.filter_string(), &self.normalized)
    }

    fn is_sub_filter_for(&self, other: &dyn Filter<T>) -> bool {
        if is_same_instance(self, other) || is_empty_filter(other) {
            return true;
        }
        other
            .as_any()
            .downcast_ref::<StringFilter>()
            .is_some_and(|other| self.narrows(other))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for StringFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "String Filter: \"{}\"", self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::test_support::Entry;
    use crate::filter::Filters;

    #[test]
    fn test_ignore_case_match() {
        let filter = StringFilter::new("ERROR", StringComparison::IgnoreCase);
        assert!(filter.check(&Entry::new("db", "connection error")));
        assert!(!filter.check(&Entry::new("db", "connected")));
    }

    #[test]
    fn test_ordinal_match() {
        let filter = StringFilter::new("Error", StringComparison::Ordinal);
        assert!(filter.check(&Entry::new("db", "Error: timeout")));
        assert!(!filter.check(&Entry::new("db", "error: timeout")));
    }

    #[test]
    fn test_longer_request_refines_shorter() {
        let narrow = Filters::by_string::<Entry>("disk full");
        let wide = Filters::by_string::<Entry>("DISK");
        assert!(narrow.is_sub_filter_for(wide.as_ref()));
        assert!(!wide.is_sub_filter_for(narrow.as_ref()));
    }

    #[test]
    fn test_different_comparison_does_not_refine() {
        let narrow = Filters::by_string_with::<Entry>("disk full", StringComparison::Ordinal);
        let wide = Filters::by_string_with::<Entry>("disk", StringComparison::IgnoreCase);
        assert!(!narrow.is_sub_filter_for(wide.as_ref()));
    }

    #[test]
    fn test_refines_itself() {
        let filter = Filters::by_string::<Entry>("x");
        assert!(filter.is_sub_filter_for(filter.as_ref()));
        assert_eq!(filter.to_string(), "String Filter: \"x\"");
    }
}
