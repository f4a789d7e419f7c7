//! Configuration for the log list engine.
//!
//! [`LogListConfig`] collects the geometry and tuning knobs shared by the
//! store, the scroller and the presenter. It serializes with serde so hosts
//! can keep it in their settings files.
//!
//! # Example
//!
//! ```
//! use horizon_loglist::LogListConfig;
//!
//! let config = LogListConfig::builder()
//!     .item_height(24.0)
//!     .parallel_filter_threshold(10_000)
//!     .build();
//!
//! assert_eq!(config.item_height, 24.0);
//! assert_eq!(config.small_change(), 72.0);
//! ```

use serde::{Deserialize, Serialize};

use horizon_loglist_core::DEFAULT_PARALLEL_THRESHOLD;

/// Default row height in pixels.
pub const DEFAULT_ITEM_HEIGHT: f64 = 20.0;
/// Default number of rows in the initial view window.
pub const DEFAULT_WINDOW_SIZE: usize = 16;
/// Default wheel/arrow step in rows.
pub const DEFAULT_SMALL_CHANGE_ROWS: usize = 3;
/// Default pixel margin kept around an item scrolled into view.
pub const DEFAULT_SCROLL_MARGIN: f64 = 25.0;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogListConfig {
    /// Uniform row height in pixels.
    pub item_height: f64,
    /// Window size used before the viewport reports its height.
    pub initial_window_size: usize,
    /// Rows moved by one wheel notch or arrow press.
    pub small_change_rows: usize,
    /// Input length at which full-set filtering runs in parallel.
    pub parallel_filter_threshold: usize,
    /// Pixel margin used by `scroll_into_view`.
    pub scroll_margin: f64,
}

impl Default for LogListConfig {
    fn default() -> Self {
        Self {
            item_height: DEFAULT_ITEM_HEIGHT,
            initial_window_size: DEFAULT_WINDOW_SIZE,
            small_change_rows: DEFAULT_SMALL_CHANGE_ROWS,
            parallel_filter_threshold: DEFAULT_PARALLEL_THRESHOLD,
            scroll_margin: DEFAULT_SCROLL_MARGIN,
        }
    }
}

impl LogListConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> LogListConfigBuilder {
        LogListConfigBuilder::new()
    }

    /// The wheel/arrow step in pixels.
    pub fn small_change(&self) -> f64 {
        self.small_change_rows as f64 * self.item_height
    }
}

/// Builder for [`LogListConfig`].
#[derive(Debug, Default)]
pub struct LogListConfigBuilder {
    config: LogListConfig,
}

impl LogListConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row height. Non-positive heights are ignored.
    pub fn item_height(mut self, height: f64) -> Self {
        if height > 0.0 {
            self.config.item_height = height;
        }
        self
    }

    /// Set the initial window size.
    pub fn initial_window_size(mut self, size: usize) -> Self {
        self.config.initial_window_size = size;
        self
    }

    /// Set the wheel/arrow step in rows.
    pub fn small_change_rows(mut self, rows: usize) -> Self {
        self.config.small_change_rows = rows;
        self
    }

    /// Set the parallel filtering threshold.
    pub fn parallel_filter_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_filter_threshold = threshold;
        self
    }

    /// Set the `scroll_into_view` margin.
    pub fn scroll_margin(mut self, margin: f64) -> Self {
        self.config.scroll_margin = margin;
        self
    }

    /// Finish building.
    pub fn build(self) -> LogListConfig {
        self.config
    }
}
