//! Prelude module for Horizon LogList.
//!
//! ```ignore
//! use horizon_loglist::prelude::*;
//! ```
//!
//! This provides access to:
//! - The store and its items (`LogStore`, `LogItem`, `Record`)
//! - Filters (`Filters`, `Filter`)
//! - Presentation (`LogView`, `Renderer`, `ViewWindow`)

// ============================================================================
// Store
// ============================================================================

pub use crate::record::{FilterableByString, LogItem, Record, RecordNumber};
pub use crate::store::{AppendOutcome, LogStore};
pub use crate::behavior::ScrollingBehavior;
pub use crate::config::LogListConfig;

// ============================================================================
// Filtering
// ============================================================================

pub use crate::filter::{Field, Filter, Filters, SharedFilter, StringComparison};
pub use crate::search::NotFoundPolicy;

// ============================================================================
// Presentation
// ============================================================================

pub use crate::reconcile::{Transition, TransitionKind};
pub use crate::render::{ContainerArena, Renderer};
pub use crate::view::LogView;
pub use crate::window::{PresentationRequest, ViewWindow};

// ============================================================================
// Signals
// ============================================================================

pub use horizon_loglist_core::{ConnectionId, Signal};
