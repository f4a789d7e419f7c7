//! Values that only notify on real change.
//!
//! The store publishes its filtered-set size through an
//! [`ObservableProperty`], the scroller its list offset. Writing the value
//! already held is a no-op, so subscribers see a deduplicated stream.
//!
//! ```
//! use horizon_loglist_core::ObservableProperty;
//!
//! let filtered_size = ObservableProperty::new(0usize);
//! filtered_size.changed().connect(|size| println!("now {size}"));
//!
//! assert!(filtered_size.set(10));
//! assert!(!filtered_size.set(10));
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::logging::targets;
use crate::signal::Signal;

/// A shared cell whose writes report whether they changed anything.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value`; `false` if it equals the current one.
    pub fn set(&self, value: T) -> bool {
        let mut slot = self.value.write();
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}

/// A [`Property`] that emits every new value on [`changed`](Self::changed).
pub struct ObservableProperty<T: Send + 'static> {
    value: Property<T>,
    changed: Signal<T>,
}

impl<T: Clone + PartialEq + Send + 'static> ObservableProperty<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Property::new(value),
            changed: Signal::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Store `value` and emit it, unless it is already held.
    ///
    /// Returns whether an emission happened.
    pub fn set(&self, value: T) -> bool {
        if !self.value.set(value.clone()) {
            return false;
        }
        tracing::trace!(target: targets::PROPERTY, "value changed");
        self.changed.emit(value);
        true
    }

    pub fn changed(&self) -> &Signal<T> {
        &self.changed
    }
}

impl<T: Clone + PartialEq + Default + Send + 'static> Default for ObservableProperty<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug + Send + 'static> fmt::Debug for ObservableProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty")
            .field("value", &self.value)
            .field("subscribers", &self.changed.connection_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(Property<usize>: Send, Sync);
static_assertions::assert_impl_all!(ObservableProperty<f64>: Send, Sync);
