//! The UI-side presenter.
//!
//! [`LogView`] ties a shared [`LogStore`] to a [`Renderer`]. Store
//! notifications may fire on any producer thread; they only enqueue onto the
//! view's [`Dispatcher`]. [`LogView::pump`] drains that queue on the UI thread,
//! where scrolling, reconciliation and rendering happen.
//!
//! Presentation requests are queued in order and never dropped. The
//! filtered-set size and offsets posted through an [`OffsetHandle`] are
//! coalesced: only the latest distinct value is applied.

use std::sync::Arc;

use parking_lot::Mutex;

use horizon_loglist_core::logging::targets;
use horizon_loglist_core::{ConnectionId, DispatchHandle, Dispatcher, Latest, ThreadAffinity};

use crate::config::LogListConfig;
use crate::error::Result;
use crate::reconcile::Reconciler;
use crate::record::{LogItem, Record, RecordNumber};
use crate::render::{apply_plan, Renderer};
use crate::scroller::Scroller;
use crate::store::LogStore;
use crate::window::PresentationRequest;

enum ViewMessage {
    Present(PresentationRequest),
    SizeChanged,
    OffsetRequested,
}

/// Posts scroll offsets to a [`LogView`] from any thread.
#[derive(Clone)]
pub struct OffsetHandle {
    latest: Latest<f64>,
    handle: DispatchHandle<ViewMessage>,
}

impl OffsetHandle {
    /// Ask the view to scroll to `offset` on its next pump.
    ///
    /// Offsets posted between two pumps collapse into the last one.
    pub fn request_offset(&self, offset: f64) -> Result<()> {
        if self.latest.offer(offset) {
            self.handle.post(ViewMessage::OffsetRequested)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for OffsetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffsetHandle").finish_non_exhaustive()
    }
}

/// Presents a window of a [`LogStore`] through a [`Renderer`].
///
/// A view is bound to the thread that attached it. It disconnects from the
/// store when dropped.
pub struct LogView<T: LogItem, R: Renderer<T>> {
    store: Arc<LogStore<T>>,
    renderer: R,
    scroller: Scroller,
    reconciler: Reconciler<T>,
    dispatcher: Dispatcher<ViewMessage>,
    size: Latest<usize>,
    offset: Latest<f64>,
    scroller_requests: Arc<Mutex<Vec<PresentationRequest>>>,
    request_connection: ConnectionId,
    size_connection: ConnectionId,
    scroll_margin: f64,
    affinity: ThreadAffinity,
}

impl<T: LogItem, R: Renderer<T>> LogView<T, R> {
    /// Connect a view to `store`.
    ///
    /// The current filtered set and window are queued so the first
    /// [`pump`](Self::pump) shows what the store already holds.
    pub fn attach(store: Arc<LogStore<T>>, renderer: R, config: &LogListConfig) -> Self {
        let dispatcher = Dispatcher::new();
        let size = Latest::new();

        let handle = dispatcher.handle();
        let request_connection = store.presentation_requests().connect(move |request| {
            post_or_warn(&handle, ViewMessage::Present(*request));
        });

        let handle = dispatcher.handle();
        let size_slot = size.clone();
        let size_connection = store.filtered_set_size().connect(move |len| {
            if size_slot.offer(*len) {
                post_or_warn(&handle, ViewMessage::SizeChanged);
            }
        });

        let scroller = Scroller::new(config);
        let scroller_requests = Arc::new(Mutex::new(Vec::new()));
        let sink = scroller_requests.clone();
        scroller.requests().connect(move |request| sink.lock().push(*request));

        if size.offer(store.filtered_len()) {
            post_or_warn(&dispatcher.handle(), ViewMessage::SizeChanged);
        }
        post_or_warn(
            &dispatcher.handle(),
            ViewMessage::Present(PresentationRequest::new(store.current_window(), false)),
        );

        tracing::debug!(target: targets::SCROLL, "view attached");
        Self {
            store,
            renderer,
            scroller,
            reconciler: Reconciler::new(),
            dispatcher,
            size,
            offset: Latest::new(),
            scroller_requests,
            request_connection,
            size_connection,
            scroll_margin: config.scroll_margin,
            affinity: ThreadAffinity::current(),
        }
    }

    /// Process everything queued since the last pump.
    ///
    /// Returns the number of messages handled.
    pub fn pump(&mut self) -> usize {
        self.affinity.assert_same_thread_with_msg("LogView pumped from wrong thread");
        let mut handled = 0;
        while let Some(message) = self.dispatcher.try_next() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    /// Whether messages are waiting for [`pump`](Self::pump).
    pub fn has_pending(&self) -> bool {
        self.dispatcher.has_pending()
    }

    /// A handle for posting offsets from other threads.
    pub fn offset_handle(&self) -> OffsetHandle {
        OffsetHandle {
            latest: self.offset.clone(),
            handle: self.dispatcher.handle(),
        }
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Resize the viewport; the window grows or shrinks to cover it.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.affinity.assert_same_thread();
        self.scroll(|scroller| scroller.set_viewport_height(height));
    }

    /// Scroll to `offset` pixels, clamped to the list.
    pub fn set_list_offset(&mut self, offset: f64) {
        self.affinity.assert_same_thread();
        self.scroll(|scroller| scroller.set_list_offset(offset));
    }

    /// Scroll by `delta` pixels; positive moves down.
    pub fn scroll_by(&mut self, delta: f64) {
        self.affinity.assert_same_thread();
        self.scroll(|scroller| scroller.scroll_by(delta));
    }

    /// Scroll so that record `number`, or the closest record to it, is shown
    /// with the configured margin.
    pub fn scroll_into_view(&mut self, number: RecordNumber) {
        self.affinity.assert_same_thread();
        let Some(index) = self.store.closest_index_of(number) else {
            return;
        };
        let margin = self.scroll_margin;
        self.scroll(|scroller| {
            scroller.scroll_into_view(index, margin);
        });
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The records on screen, top to bottom.
    pub fn visible(&self) -> &[Record<T>] {
        self.reconciler.visible()
    }

    /// Viewport-relative pixel position of visible row `index`.
    pub fn relative_offset_of(&self, index: usize) -> f64 {
        self.scroller.relative_offset_from_index(index)
    }

    /// The scroll state.
    pub fn scroller(&self) -> &Scroller {
        &self.scroller
    }

    /// The store this view presents.
    pub fn store(&self) -> &Arc<LogStore<T>> {
        &self.store
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The renderer, mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn handle(&mut self, message: ViewMessage) {
        match message {
            ViewMessage::Present(request) => {
                self.scroll(|scroller| scroller.apply_outer_request(request));
            }
            ViewMessage::SizeChanged => {
                if let Some(len) = self.size.take() {
                    self.scroller.set_item_count(len);
                }
            }
            ViewMessage::OffsetRequested => {
                if let Some(offset) = self.offset.take() {
                    self.scroll(|scroller| scroller.set_list_offset(offset));
                }
            }
        }
    }

    /// Run a scroller operation, then present the windows it emitted and
    /// reposition the visible rows if the offset moved.
    fn scroll(&mut self, op: impl FnOnce(&mut Scroller)) {
        let before = self.scroller.list_offset();
        op(&mut self.scroller);
        if self.scroller.list_offset() != before {
            // A posted offset equal to the last posted one must apply again.
            self.offset.reset();
        }

        let requests = std::mem::take(&mut *self.scroller_requests.lock());
        let presented = !requests.is_empty();
        for request in requests {
            self.present(request);
        }
        if presented || self.scroller.list_offset() != before {
            self.reposition();
        }
    }

    fn present(&mut self, request: PresentationRequest) {
        let records = self.store.present(request.window);
        let plan = self.reconciler.reconcile(&records, request.window.size);
        tracing::trace!(
            target: targets::RECONCILE,
            %request,
            transitions = plan.len(),
            "presenting window"
        );
        apply_plan(&plan, &mut self.renderer, request.animate);
        self.reconciler.commit(&plan);
    }

    fn reposition(&mut self) {
        for (index, record) in self.reconciler.visible().iter().enumerate() {
            let y = self.scroller.relative_offset_from_index(index);
            self.renderer.position(record, y);
        }
    }
}

impl<T: LogItem, R: Renderer<T>> Drop for LogView<T, R> {
    fn drop(&mut self) {
        self.store.presentation_requests().disconnect(self.request_connection);
        self.store.filtered_set_size().disconnect(self.size_connection);
    }
}

impl<T: LogItem, R: Renderer<T>> std::fmt::Debug for LogView<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogView")
            .field("scroller", &self.scroller)
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}

fn post_or_warn(handle: &DispatchHandle<ViewMessage>, message: ViewMessage) {
    if let Err(err) = handle.post(message) {
        horizon_loglist_core::loglist_warn!(%err, "dropping view message");
    }
}
