use std::any::Any;
use std::fmt;

use super::{is_empty_filter, is_same_instance, Filter, SharedFilter};

/// Accepts an item only when every child accepts it.
pub struct CompositeAllFilter<T> {
    children: Vec<SharedFilter<T>>,
}

impl<T> CompositeAllFilter<T> {
    /// Create the conjunction of `children`. No children accepts everything.
    pub fn new(children: Vec<SharedFilter<T>>) -> Self {
        Self { children }
    }

    /// The child filters.
    pub fn children(&self) -> &[SharedFilter<T>] {
        &self.children
    }
}

impl<T: 'static> Filter<T> for CompositeAllFilter<T> {
    fn check(&self, item: &T) -> bool {
        self.children.iter().all(|child| child.check(item))
    }

    fn is_sub_filter_for(&self, other: &dyn Filter<T>) -> bool {
        if is_same_instance(self, other) || is_empty_filter(other) {
            return true;
        }
        let Some(other) = other.as_any().downcast_ref::<CompositeAllFilter<T>>() else {
            return false;
        };
        // Each of their constraints must be implied by one of ours.
        other.children.iter().all(|theirs| {
            self.children
                .iter()
                .any(|ours| ours.is_sub_filter_for(theirs.as_ref()))
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> fmt::Display for CompositeAllFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "All of [")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use crate::filter::test_support::Entry;
    use crate::filter::{Field, Filters};

    fn source() -> Field<Entry> {
        Field::new("source", |e: &Entry| e.source)
    }

    #[test]
    fn test_conjunction() {
        let filter = Filters::all(vec![
            Filters::by_string::<Entry>("disk"),
            Filters::by_fields("db", vec![source()]),
        ]);
        assert!(filter.check(&Entry::new("db", "disk full")));
        assert!(!filter.check(&Entry::new("web", "disk full")));
        assert!(!filter.check(&Entry::new("db", "ok")));
    }

    #[test]
    fn test_refinement_by_children() {
        let wide = Filters::all(vec![Filters::by_string::<Entry>("disk")]);
        let narrow = Filters::all(vec![
            Filters::by_string::<Entry>("disk full"),
            Filters::by_fields("db", vec![source()]),
        ]);
        assert!(narrow.is_sub_filter_for(wide.as_ref()));
        assert!(!wide.is_sub_filter_for(narrow.as_ref()));
    }

    #[test]
    fn test_composite_does_not_refine_plain_filter() {
        let plain = Filters::by_string::<Entry>("disk");
        let composite = Filters::all(vec![Filters::by_string::<Entry>("disk full")]);
        assert!(!composite.is_sub_filter_for(plain.as_ref()));
    }

    #[test]
    fn test_display() {
        let filter = Filters::all(vec![Filters::by_string::<Entry>("a"), Filters::empty()]);
        assert_eq!(filter.to_string(), "All of [String Filter: \"a\", Empty Filter]");
    }
}
