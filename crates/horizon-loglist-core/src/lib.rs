//! Core systems for Horizon LogList.
//!
//! This crate provides the plumbing underneath the log list engine:
//!
//! - **Signal/Slot System**: Type-safe notification ports
//! - **Property System**: Values with change detection and deduplicated notification
//! - **Dispatcher**: A FIFO queue drained on the UI thread
//! - **Coalescing**: "Distinct by latest" delivery for high-frequency streams
//! - **Parallel Filtering**: Order-preserving rayon filtering above a size threshold
//! - **Thread Affinity**: Runtime checks for UI-owned state
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_loglist_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Cross-thread Delivery
//!
//! ```
//! use horizon_loglist_core::{Dispatcher, Latest, Signal};
//!
//! #[derive(Debug, PartialEq)]
//! enum UiMessage {
//!     SizeChanged,
//! }
//!
//! let dispatcher = Dispatcher::new();
//! let handle = dispatcher.handle();
//! let latest_size = Latest::new();
//!
//! let size_changed = Signal::<usize>::new();
//! let producer_side = latest_size.clone();
//! size_changed.connect(move |&size| {
//!     if producer_side.offer(size) {
//!         let _ = handle.post(UiMessage::SizeChanged);
//!     }
//! });
//!
//! size_changed.emit(10);
//! size_changed.emit(11);
//!
//! let mut sizes = Vec::new();
//! dispatcher.process_pending(|_msg| {
//!     if let Some(size) = latest_size.take() {
//!         sizes.push(size);
//!     }
//! });
//! assert_eq!(sizes, vec![11]);
//! ```

mod coalesce;
mod dispatcher;
mod error;
pub mod logging;
pub mod parallel;
pub mod property;
pub mod signal;
pub mod thread_check;

#[doc(hidden)]
pub use tracing;

pub use coalesce::Latest;
pub use dispatcher::{DispatchHandle, Dispatcher, MessageId};
pub use error::{CoreError, DispatchError, Result, SignalError, ThreadPoolError};
pub use logging::PerfSpan;
pub use parallel::{ParallelFilter, DEFAULT_PARALLEL_THRESHOLD};
pub use property::{ObservableProperty, Property};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
