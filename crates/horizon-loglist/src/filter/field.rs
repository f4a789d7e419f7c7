use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;

use super::{is_empty_filter, is_same_instance, Filter, StringComparison};

/// A named string accessor on an item.
///
/// The name identifies the field when comparing filters; two accessors with
/// the same name are assumed to read the same text.
pub struct Field<T> {
    /// Field name.
    pub name: &'static str,
    /// Accessor.
    pub get: fn(&T) -> &str,
}

impl<T> Field<T> {
    /// Create a field accessor.
    pub const fn new(name: &'static str, get: fn(&T) -> &str) -> Self {
        Self { name, get }
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

/// Substring match over one or more named fields; any matching field accepts.
pub struct FieldFilter<T> {
    request: String,
    normalized: String,
    comparison: StringComparison,
    fields: Vec<Field<T>>,
    names: BTreeSet<&'static str>,
}

impl<T> FieldFilter<T> {
    /// Create a filter for `request` over `fields`.
    pub fn new(request: impl Into<String>, comparison: StringComparison, fields: Vec<Field<T>>) -> Self {
        let request = request.into();
        let normalized = comparison.normalize(&request);
        let names = fields.iter().map(|field| field.name).collect();
        Self {
            request,
            normalized,
            comparison,
            fields,
            names,
        }
    }

    /// The text searched for.
    pub fn request(&self) -> &str {
        &self.request
    }

    /// The names of the searched fields.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }
}

impl<T: 'static> Filter<T> for FieldFilter<T> {
    fn check(&self, item: &T) -> bool {
        self.fields
            .iter()
            .any(|field| self.comparison.contains((field.get)(item), &self.normalized))
    }

    fn is_sub_filter_for(&self, other: &dyn Filter<T>) -> bool {
        if is_same_instance(self, other) || is_empty_filter(other) {
            return true;
        }
        other
            .as_any()
            .downcast_ref::<FieldFilter<T>>()
            .is_some_and(|other| {
                other.comparison == self.comparison
                    && other.names == self.names
                    && self.normalized.contains(&other.normalized)
            })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> fmt::Display for FieldFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names.iter().copied().collect();
        write!(f, "String Filter: \"{}\" ({})", self.request, names.join(", "))
    }
}

impl<T> fmt::Debug for FieldFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldFilter")
            .field("request", &self.request)
            .field("comparison", &self.comparison)
            .field("fields", &self.names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::test_support::Entry;
    use crate::filter::Filters;

    fn source() -> Field<Entry> {
        Field::new("source", |e: &Entry| e.source)
    }

    fn message() -> Field<Entry> {
        Field::new("message", |e: &Entry| e.message)
    }

    #[test]
    fn test_any_field_matches() {
        let filter = FieldFilter::new("net", StringComparison::IgnoreCase, vec![source(), message()]);
        assert!(filter.check(&Entry::new("NET", "up")));
        assert!(filter.check(&Entry::new("db", "network down")));
        assert!(!filter.check(&Entry::new("db", "disk")));
    }

    #[test]
    fn test_refinement_needs_same_field_set() {
        let narrow = Filters::by_fields("network", vec![message(), source()]);
        let wide = Filters::by_fields("net", vec![source(), message()]);
        let other_fields = Filters::by_fields("net", vec![source()]);

        assert!(narrow.is_sub_filter_for(wide.as_ref()));
        assert!(!narrow.is_sub_filter_for(other_fields.as_ref()));
        assert!(!wide.is_sub_filter_for(narrow.as_ref()));
    }

    #[test]
    fn test_display_lists_fields() {
        let filter = FieldFilter::new("x", StringComparison::Ordinal, vec![source(), message()]);
        assert_eq!(filter.to_string(), "String Filter: \"x\" (message, source)");
    }
}
