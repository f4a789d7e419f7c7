//! Record filters.
//!
//! A [`Filter`] accepts or rejects items and knows when it refines another
//! filter. The store uses refinement to filter the previous result instead
//! of the full record set: typing one more character into a search box only
//! narrows what is already shown.
//!
//! # Filter Types
//!
//! - [`EmptyFilter`]: accepts everything
//! - [`StringFilter`]: substring match on [`FilterableByString`](crate::FilterableByString)
//! - [`FieldFilter`]: substring match over named field accessors
//! - [`CompositeAllFilter`]: logical AND of child filters
//!
//! Use the [`Filters`] constructors to build them as shared trait objects.

mod composite;
mod empty;
mod field;
mod string;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use composite::CompositeAllFilter;
pub use empty::EmptyFilter;
pub use field::{Field, FieldFilter};
pub use string::StringFilter;

use crate::record::FilterableByString;

/// A shared, type-erased filter.
pub type SharedFilter<T> = Arc<dyn Filter<T>>;

/// An immutable predicate over log items.
pub trait Filter<T>: fmt::Display + Send + Sync + 'static {
    /// Whether the item passes the filter.
    fn check(&self, item: &T) -> bool;

    /// Whether every item accepted by `self` is also accepted by `other`.
    ///
    /// Returning `false` is always safe; it only costs a full re-filter.
    fn is_sub_filter_for(&self, other: &dyn Filter<T>) -> bool;

    /// Get this as Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// How substring requests compare text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StringComparison {
    /// Exact, case-sensitive comparison.
    Ordinal,
    /// Case-insensitive comparison.
    #[default]
    IgnoreCase,
}

impl StringComparison {
    /// Bring a request or haystack into comparable form.
    pub(crate) fn normalize(self, text: &str) -> String {
        match self {
            Self::Ordinal => text.to_owned(),
            Self::IgnoreCase => text.to_lowercase(),
        }
    }

    /// Whether `haystack` contains the already normalized `needle`.
    pub(crate) fn contains(self, haystack: &str, normalized_needle: &str) -> bool {
        match self {
            Self::Ordinal => haystack.contains(normalized_needle),
            Self::IgnoreCase => haystack.to_lowercase().contains(normalized_needle),
        }
    }
}

/// Whether `other` is the very filter object `ours`.
pub(crate) fn is_same_instance<T, F: Filter<T>>(ours: &F, other: &dyn Filter<T>) -> bool {
    std::ptr::addr_eq(ours as *const F, other as *const dyn Filter<T>)
}

/// Whether `other` is the accept-all filter.
pub(crate) fn is_empty_filter<T: 'static>(other: &dyn Filter<T>) -> bool {
    other.as_any().is::<EmptyFilter>()
}

/// Constructors for the built-in filters.
pub struct Filters;

impl Filters {
    /// The accept-all filter.
    pub fn empty<T: 'static>() -> SharedFilter<T> {
        Arc::new(EmptyFilter)
    }

    /// A case-insensitive substring filter over the item's filter string.
    pub fn by_string<T>(request: impl Into<String>) -> SharedFilter<T>
    where
        T: FilterableByString + 'static,
    {
        Self::by_string_with(request, StringComparison::default())
    }

    /// A substring filter with an explicit comparison.
    pub fn by_string_with<T>(request: impl Into<String>, comparison: StringComparison) -> SharedFilter<T>
    where
        T: FilterableByString + 'static,
    {
        Arc::new(StringFilter::new(request, comparison))
    }

    /// A case-insensitive substring filter over named fields.
    pub fn by_fields<T: 'static>(request: impl Into<String>, fields: Vec<Field<T>>) -> SharedFilter<T> {
        Arc::new(FieldFilter::new(request, StringComparison::default(), fields))
    }

    /// A field filter with an explicit comparison.
    pub fn by_fields_with<T: 'static>(
        request: impl Into<String>,
        comparison: StringComparison,
        fields: Vec<Field<T>>,
    ) -> SharedFilter<T> {
        Arc::new(FieldFilter::new(request, comparison, fields))
    }

    /// The conjunction of `children`.
    pub fn all<T: 'static>(children: Vec<SharedFilter<T>>) -> SharedFilter<T> {
        Arc::new(CompositeAllFilter::new(children))
    }
}
