//! Horizon LogList - a virtualized, animated log list engine.
//!
//! Producers append timestamped items to a shared [`LogStore`] from any
//! thread. The store keeps every record plus the subset accepted by the
//! active [`Filter`], and tells the UI which window of that subset to show.
//! On the UI thread a [`LogView`] scrolls, diffs consecutive windows into
//! [`Transition`]s and hands them to a [`Renderer`].
//!
//! # Example
//!
//! ```
//! use std::borrow::Cow;
//! use horizon_loglist::prelude::*;
//!
//! #[derive(Debug)]
//! struct Line {
//!     time: u64,
//!     text: String,
//! }
//!
//! impl LogItem for Line {
//!     type Time = u64;
//!     fn time(&self) -> u64 {
//!         self.time
//!     }
//! }
//!
//! impl FilterableByString for Line {
//!     fn filter_string(&self) -> Cow<'_, str> {
//!         Cow::Borrowed(&self.text)
//!     }
//! }
//!
//! let store = LogStore::<Line>::shared();
//! for (time, text) in [(1, "boot"), (2, "disk error"), (3, "ready")] {
//!     let line = Line { time, text: text.to_owned() };
//!     store.append(line, ScrollingBehavior::ScrollToNew, true);
//! }
//!
//! store.apply_filter(Some(Filters::by_string("error")), ScrollingBehavior::PreservePosition, false);
//! assert_eq!(store.filtered_len(), 1);
//! ```

pub mod behavior;
pub mod config;
mod error;
pub mod filter;
pub mod prelude;
pub mod reconcile;
pub mod record;
pub mod render;
pub mod scroller;
pub mod search;
pub mod selection;
pub mod store;
pub mod view;
pub mod window;

pub use behavior::ScrollingBehavior;
pub use config::{LogListConfig, LogListConfigBuilder};
pub use error::{LogListError, Result};
pub use filter::{Filter, Filters, SharedFilter, StringComparison};
pub use reconcile::{reconcile, Reconciler, Transition, TransitionKind, TransitionPlan};
pub use record::{FilterableByString, LogItem, Record, RecordNumber};
pub use render::{apply_plan, ContainerArena, ContainerId, Renderer};
pub use scroller::Scroller;
pub use search::NotFoundPolicy;
pub use selection::Selection;
pub use store::{AppendOutcome, Editor, LogStore};
pub use view::{LogView, OffsetHandle};
pub use window::{PresentationRequest, ViewWindow};
