//! Tracing targets, a timing guard and target-scoped log macros.
//!
//! Everything logs through `tracing`; the host installs the subscriber,
//! for instance `RUST_LOG=horizon_loglist::store=debug` with
//! `tracing_subscriber::EnvFilter`.

use std::time::{Duration, Instant};

/// `tracing` targets, one per subsystem.
pub mod targets {
    pub const STORE: &str = "horizon_loglist::store";
    pub const FILTER: &str = "horizon_loglist::filter";
    /// Scroller and window requests.
    pub const SCROLL: &str = "horizon_loglist::scroll";
    pub const RECONCILE: &str = "horizon_loglist::reconcile";
    pub const DISPATCH: &str = "horizon_loglist_core::dispatch";
    pub const SIGNAL: &str = "horizon_loglist_core::signal";
    pub const PROPERTY: &str = "horizon_loglist_core::property";
    /// [`PerfSpan`](super::PerfSpan) timings.
    pub const PERF: &str = "horizon_loglist::perf";
}

/// Enters an `info` span for its lifetime and logs the elapsed time on drop.
///
/// ```
/// use horizon_loglist_core::logging::PerfSpan;
///
/// let perf = PerfSpan::new("filter_original");
/// assert!(perf.elapsed().as_secs() < 60);
/// ```
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
    operation: &'static str,
    started: Instant,
}

impl PerfSpan {
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation);
        Self {
            span: span.entered(),
            operation,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::trace!(
            target: targets::PERF,
            operation = self.operation,
            elapsed_us = self.started.elapsed().as_micros() as u64,
            "operation finished"
        );
    }
}

/// `tracing::trace!` under the `horizon_loglist` target.
#[macro_export]
macro_rules! loglist_trace {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "horizon_loglist", $($arg)*)
    };
}

#[macro_export]
macro_rules! loglist_debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "horizon_loglist", $($arg)*)
    };
}

#[macro_export]
macro_rules! loglist_info {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "horizon_loglist", $($arg)*)
    };
}

#[macro_export]
macro_rules! loglist_warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "horizon_loglist", $($arg)*)
    };
}

#[macro_export]
macro_rules! loglist_error {
    ($($arg:tt)*) => {
        $crate::tracing::error!(target: "horizon_loglist", $($arg)*)
    };
}
