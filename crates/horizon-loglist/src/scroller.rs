//! Scroll offset and view window computation.
//!
//! The [`Scroller`] turns a pixel offset and a viewport height into a
//! [`ViewWindow`] of uniform-height rows. Every change of offset or viewport
//! produces a window, emitted on [`Scroller::requests`] only when it differs
//! from the last one. Requests coming from the store are folded in through
//! [`Scroller::apply_outer_request`], which moves the offset without emitting
//! an intermediate window.

use horizon_loglist_core::logging::targets;
use horizon_loglist_core::{ObservableProperty, Signal};

use crate::config::LogListConfig;
use crate::window::{PresentationRequest, ViewWindow};

/// Pixel-level scroll state for a list of uniform rows.
pub struct Scroller {
    item_height: f64,
    small_change: f64,
    list_offset: ObservableProperty<f64>,
    viewport_height: f64,
    item_count: usize,
    /// Offset of `list_offset` within its row.
    shift: f64,
    suppress_requests: bool,
    last_window: Option<ViewWindow>,
    requests: Signal<PresentationRequest>,
}

impl Scroller {
    /// Create a scroller with the given geometry.
    pub fn new(config: &LogListConfig) -> Self {
        Self {
            item_height: config.item_height,
            small_change: config.small_change(),
            list_offset: ObservableProperty::new(0.0),
            viewport_height: 0.0,
            item_count: 0,
            shift: 0.0,
            suppress_requests: false,
            last_window: None,
            requests: Signal::new(),
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Row height in pixels.
    pub fn item_height(&self) -> f64 {
        self.item_height
    }

    /// Number of rows in the filtered set.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Height of the whole list in pixels.
    pub fn list_height(&self) -> f64 {
        self.item_count as f64 * self.item_height
    }

    /// Height of the visible area in pixels.
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// The largest valid offset.
    pub fn scrollable_maximum(&self) -> f64 {
        (self.list_height() - self.viewport_height).max(0.0)
    }

    /// Wheel/arrow step in pixels.
    pub fn small_change(&self) -> f64 {
        self.small_change
    }

    /// Current scroll offset in pixels.
    pub fn list_offset(&self) -> f64 {
        self.list_offset.get()
    }

    /// Emits the offset whenever it changes.
    pub fn offset_changed(&self) -> &Signal<f64> {
        self.list_offset.changed()
    }

    /// Row under pixel offset `offset`.
    pub fn index_from_offset(&self, offset: f64) -> usize {
        (offset / self.item_height).floor().max(0.0) as usize
    }

    /// Pixel offset of row `index`.
    pub fn offset_from_index(&self, index: usize) -> f64 {
        index as f64 * self.item_height
    }

    /// Rows needed to cover `viewport` pixels, plus one for a partial row.
    pub fn window_size(&self, viewport: f64) -> usize {
        (viewport / self.item_height).ceil().max(0.0) as usize + 1
    }

    /// The window for the current offset and viewport.
    pub fn current_window(&self) -> ViewWindow {
        ViewWindow::new(
            self.index_from_offset(self.list_offset()),
            self.window_size(self.viewport_height),
        )
    }

    /// The last window emitted on [`requests`](Self::requests).
    pub fn last_window(&self) -> Option<ViewWindow> {
        self.last_window
    }

    /// Pixel position, relative to the viewport top, of row `index` of the
    /// last emitted window.
    pub fn relative_offset_from_index(&self, index: usize) -> f64 {
        let window_offset = self.last_window.map_or(0, |w| w.offset);
        self.offset_from_index(index + window_offset) - self.list_offset()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Set the scroll offset, clamped to `[0, scrollable_maximum]`.
    pub fn set_list_offset(&mut self, offset: f64) {
        let clamped = offset.clamp(0.0, self.scrollable_maximum());
        if self.list_offset.set(clamped) {
            self.shift = clamped - self.offset_from_index(self.index_from_offset(clamped));
            self.emit_window();
        }
    }

    /// Scroll by `delta` pixels.
    pub fn scroll_by(&mut self, delta: f64) {
        self.set_list_offset(self.list_offset() + delta);
    }

    /// Scroll by whole small-change steps; positive moves down.
    pub fn scroll_steps(&mut self, steps: i32) {
        self.scroll_by(f64::from(steps) * self.small_change);
    }

    /// Scroll the minimum amount that shows row `index` with `margin` pixels
    /// of room. Returns whether the offset moved.
    pub fn scroll_into_view(&mut self, index: usize, margin: f64) -> bool {
        let before = self.list_offset();
        let item_offset = self.offset_from_index(index);

        if item_offset < before + margin {
            self.set_list_offset(item_offset - margin);
        } else if item_offset > before + self.viewport_height - margin {
            self.set_list_offset(item_offset - self.viewport_height + margin);
        }
        self.list_offset() != before
    }

    /// Update the viewport height.
    pub fn set_viewport_height(&mut self, height: f64) {
        let height = height.max(0.0);
        if height != self.viewport_height {
            self.viewport_height = height;
            self.emit_window();
        }
    }

    /// Update the number of rows.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
    }

    /// Fold in a request that originated outside the scroller.
    ///
    /// The offset moves to the requested row, keeping the current
    /// within-row shift, without emitting a window of its own. The request
    /// itself is then emitted and its window becomes the last emitted one.
    /// Once the viewport has a height, the window is resized to cover it.
    pub fn apply_outer_request(&mut self, mut request: PresentationRequest) {
        if self.viewport_height > 0.0 {
            request.window.size = self.window_size(self.viewport_height);
        }
        let target = self.offset_from_index(request.window.offset) + self.shift;

        self.suppress_requests = true;
        self.set_list_offset(target);
        self.suppress_requests = false;

        tracing::trace!(target: targets::SCROLL, %request, "applying outer request");
        self.last_window = Some(request.window);
        self.requests.emit(request);
    }

    /// Windows to present, in order.
    pub fn requests(&self) -> &Signal<PresentationRequest> {
        &self.requests
    }

    fn emit_window(&mut self) {
        if self.suppress_requests {
            return;
        }
        let window = self.current_window();
        if self.last_window == Some(window) {
            return;
        }
        tracing::trace!(target: targets::SCROLL, %window, "scroller window changed");
        self.last_window = Some(window);
        self.requests.emit(PresentationRequest::new(window, false));
    }
}

impl std::fmt::Debug for Scroller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scroller")
            .field("list_offset", &self.list_offset())
            .field("viewport_height", &self.viewport_height)
            .field("item_count", &self.item_count)
            .field("last_window", &self.last_window)
            .finish()
    }
}
