//! The ordered record store.
//!
//! [`LogStore`] owns every record ever appended (`original`) and the subset
//! accepted by the active filter (`filtered`). Producers append from any
//! thread; the UI pulls window slices with [`LogStore::present`] in response
//! to the presentation requests the store emits.
//!
//! # Example
//!
//! ```
//! use horizon_loglist::{LogItem, LogStore, ScrollingBehavior, ViewWindow};
//!
//! #[derive(Debug)]
//! struct Line(u64);
//!
//! impl LogItem for Line {
//!     type Time = u64;
//!     fn time(&self) -> u64 {
//!         self.0
//!     }
//! }
//!
//! let store = LogStore::new();
//! store.append(Line(1), ScrollingBehavior::ScrollToNew, false);
//! store.append(Line(2), ScrollingBehavior::ScrollToNew, false);
//!
//! let visible = store.present(ViewWindow::new(0, 16));
//! assert_eq!(visible.len(), 2);
//! ```

use std::ops::Range;
use std::sync::Arc;

use parking_lot::Mutex;

use horizon_loglist_core::logging::targets;
use horizon_loglist_core::{ObservableProperty, ParallelFilter, PerfSpan, Signal};

use crate::behavior::ScrollingBehavior;
use crate::config::LogListConfig;
use crate::error::{LogListError, Result};
use crate::filter::{EmptyFilter, SharedFilter};
use crate::record::{LogItem, Record, RecordNumber};
use crate::search::{search_by_number, NotFoundPolicy};
use crate::selection::{closest_index, Selection};
use crate::window::{PresentationRequest, ViewWindow};

/// The result of appending a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    /// The number assigned to the new record.
    pub number: RecordNumber,
    /// Its position in the filtered set, if the active filter accepted it.
    pub filtered_index: Option<usize>,
}

struct StoreState<T> {
    original: Vec<Record<T>>,
    filtered: Vec<Record<T>>,
    filter: SharedFilter<T>,
    window: ViewWindow,
    selection: Selection,
}

impl<T> StoreState<T> {
    fn next_number(&self) -> RecordNumber {
        self.original
            .last()
            .map_or(RecordNumber::FIRST, |last| last.number().next())
    }
}

/// Thread-safe store of numbered log records and their filtered subset.
///
/// All state sits behind one mutex. Notifications are emitted while that
/// lock is held, so their order matches mutation order; connected slots must
/// not call back into the store synchronously.
pub struct LogStore<T: LogItem> {
    state: Mutex<StoreState<T>>,
    parallel: ParallelFilter,
    presentation_requests: Signal<PresentationRequest>,
    filtered_set_size: ObservableProperty<usize>,
    selection_changed: Signal<Vec<RecordNumber>>,
}

impl<T: LogItem> Default for LogStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LogItem> LogStore<T> {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&LogListConfig::default())
    }

    /// Create an empty store.
    pub fn with_config(config: &LogListConfig) -> Self {
        Self::with_parallel_filter(config, ParallelFilter::new(config.parallel_filter_threshold))
    }

    /// Create an empty store that filters with the given rayon setup.
    pub fn with_parallel_filter(config: &LogListConfig, parallel: ParallelFilter) -> Self {
        Self {
            state: Mutex::new(StoreState {
                original: Vec::new(),
                filtered: Vec::new(),
                filter: Arc::new(EmptyFilter),
                window: ViewWindow::new(0, config.initial_window_size),
                selection: Selection::new(),
            }),
            parallel,
            presentation_requests: Signal::new(),
            filtered_set_size: ObservableProperty::new(0),
            selection_changed: Signal::new(),
        }
    }

    /// Create a shared store.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append one item.
    pub fn append(&self, item: T, behavior: ScrollingBehavior, animate: bool) -> AppendOutcome {
        self.mutate(behavior, animate, |editor| editor.append(item))
    }

    /// Append several items as one contiguous number range.
    pub fn append_batch<I>(&self, items: I, behavior: ScrollingBehavior, animate: bool) -> Range<RecordNumber>
    where
        I: IntoIterator<Item = T>,
    {
        self.mutate(behavior, animate, |editor| editor.append_batch(items))
    }

    /// Remove every record.
    ///
    /// The window returns to offset 0 with its size preserved, the selection
    /// is cleared and a non-animated presentation request is always emitted.
    pub fn clear(&self) {
        self.mutate(ScrollingBehavior::PreservePosition, false, |editor| editor.clear());
    }

    /// Run several mutations under a single lock acquisition.
    ///
    /// The edit is all-or-nothing: if `edit` returns an error, the store is
    /// restored to its pre-edit state and nothing is emitted. At most one
    /// presentation request is emitted, after all mutations.
    #[tracing::instrument(skip_all, target = "horizon_loglist::store", level = "trace")]
    pub fn edit<R, F>(&self, edit: F, behavior: ScrollingBehavior, animate: bool) -> Result<R>
    where
        F: FnOnce(&mut Editor<'_, T>) -> Result<R>,
    {
        let mut state = self.state.lock();
        let checkpoint = Checkpoint::take(&*state);
        let mut editor = Editor::new(&mut *state, &self.parallel, behavior);

        match edit(&mut editor) {
            Ok(value) => {
                let summary = editor.finish();
                self.commit(&mut *state, summary, animate);
                Ok(value)
            }
            Err(err) => {
                editor.rollback(checkpoint);
                tracing::warn!(target: targets::STORE, error = %err, "edit rolled back");
                Err(err)
            }
        }
    }

    fn mutate<R>(
        &self,
        behavior: ScrollingBehavior,
        animate: bool,
        f: impl FnOnce(&mut Editor<'_, T>) -> R,
    ) -> R {
        let mut state = self.state.lock();
        let mut editor = Editor::new(&mut *state, &self.parallel, behavior);
        let value = f(&mut editor);
        let summary = editor.finish();
        self.commit(&mut *state, summary, animate);
        value
    }

    fn commit(&self, state: &mut StoreState<T>, summary: EditSummary, animate: bool) {
        if summary.cleared && state.selection.clear() {
            self.selection_changed.emit(Vec::new());
        }

        self.filtered_set_size.set(state.filtered.len());

        if summary.view_changed {
            state.window = summary.window;
            let request = PresentationRequest::new(summary.window, animate && !summary.cleared);
            tracing::debug!(target: targets::STORE, %request, "edit changed the view");
            self.presentation_requests.emit(request);
        }
    }

    /// Replace the active filter.
    ///
    /// When the new filter refines the current one only the current filtered
    /// set is scanned; otherwise every record is. `None` means accept-all.
    #[tracing::instrument(skip_all, target = "horizon_loglist::filter", level = "trace")]
    pub fn apply_filter(&self, filter: Option<SharedFilter<T>>, behavior: ScrollingBehavior, animate: bool) {
        let filter = filter.unwrap_or_else(|| Arc::new(EmptyFilter));
        let mut state = self.state.lock();

        let refines = filter.is_sub_filter_for(state.filter.as_ref());
        let input = if refines { &state.filtered } else { &state.original };
        tracing::debug!(
            target: targets::FILTER,
            %filter,
            refines,
            input_len = input.len(),
            "applying filter"
        );

        let filtered = {
            let _perf = PerfSpan::new("apply_filter");
            self.parallel.filter(input, |record| filter.check(record.item()))
        };

        let old_filtered = std::mem::replace(&mut state.filtered, filtered);
        state.filter = filter;

        let offset = behavior.filter_offset(&old_filtered, &state.filtered, state.window);
        let window = state.window.with_offset(offset);
        state.window = window;

        self.filtered_set_size.set(state.filtered.len());
        self.presentation_requests.emit(PresentationRequest::new(window, animate));
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Return the records of `window`, clamped to the filtered set, and make
    /// it the current window.
    pub fn present(&self, window: ViewWindow) -> Vec<Record<T>> {
        let mut state = self.state.lock();
        let range = window.clamp_to(state.filtered.len());
        state.window = window;
        state.filtered[range].to_vec()
    }

    /// Presentation requests, in emission order.
    pub fn presentation_requests(&self) -> &Signal<PresentationRequest> {
        &self.presentation_requests
    }

    /// The filtered-set size, emitted only when it changes.
    pub fn filtered_set_size(&self) -> &Signal<usize> {
        self.filtered_set_size.changed()
    }

    /// The selection after each change.
    pub fn selection_changed(&self) -> &Signal<Vec<RecordNumber>> {
        &self.selection_changed
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.state.lock().original.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.state.lock().original.is_empty()
    }

    /// Number of records accepted by the active filter.
    pub fn filtered_len(&self) -> usize {
        self.state.lock().filtered.len()
    }

    /// The most recently requested or presented window.
    pub fn current_window(&self) -> ViewWindow {
        self.state.lock().window
    }

    /// The active filter.
    pub fn filter(&self) -> SharedFilter<T> {
        self.state.lock().filter.clone()
    }

    /// The number of the last appended record.
    pub fn last_number(&self) -> Option<RecordNumber> {
        self.state.lock().original.last().map(Record::number)
    }

    /// A snapshot of the filtered set.
    pub fn filtered_records(&self) -> Vec<Record<T>> {
        self.state.lock().filtered.clone()
    }

    /// Position of a record in the filtered set.
    pub fn index_of(&self, number: RecordNumber, policy: NotFoundPolicy) -> Option<usize> {
        search_by_number(&self.state.lock().filtered, number, policy)
    }

    /// Filtered index of `number`, or of the nearest filtered record when
    /// `number` is absent. `None` only when the filtered set is empty.
    pub fn closest_index_of(&self, number: RecordNumber) -> Option<usize> {
        let state = self.state.lock();
        let last = state.filtered.len().checked_sub(1)?;
        Some(closest_index(&state.filtered, number).min(last))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Add `number` to the selection, or remove it if already selected.
    pub fn toggle_selection(&self, number: RecordNumber) {
        let mut state = self.state.lock();
        state.selection.toggle(number);
        self.selection_changed.emit(state.selection.to_vec());
    }

    /// Make `number` the only selected record.
    pub fn select(&self, number: RecordNumber) {
        let mut state = self.state.lock();
        if state.selection.select(number) {
            self.selection_changed.emit(state.selection.to_vec());
        }
    }

    /// Extend the selection towards `to` along the filtered set.
    pub fn extend_selection(&self, to: RecordNumber) {
        let mut state = self.state.lock();
        let StoreState {
            filtered, selection, ..
        } = &mut *state;
        if selection.extend_to(to, filtered) {
            self.selection_changed.emit(selection.to_vec());
        }
    }

    /// Deselect everything.
    pub fn clear_selection(&self) {
        let mut state = self.state.lock();
        if state.selection.clear() {
            self.selection_changed.emit(Vec::new());
        }
    }

    /// The selected record numbers in ascending order.
    pub fn selection(&self) -> Vec<RecordNumber> {
        self.state.lock().selection.to_vec()
    }
}

impl<T: LogItem> std::fmt::Debug for LogStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LogStore")
            .field("len", &state.original.len())
            .field("filtered_len", &state.filtered.len())
            .field("window", &state.window)
            .field("filter", &state.filter.to_string())
            .finish()
    }
}

// =============================================================================
// Editor
// =============================================================================

struct Checkpoint {
    original_len: usize,
    filtered_len: usize,
    window: ViewWindow,
}

impl Checkpoint {
    fn take<T>(state: &StoreState<T>) -> Self {
        Self {
            original_len: state.original.len(),
            filtered_len: state.filtered.len(),
            window: state.window,
        }
    }
}

struct EditSummary {
    view_changed: bool,
    window: ViewWindow,
    cleared: bool,
}

/// Mutation handle passed to [`LogStore::edit`].
///
/// Changes are applied to the store as they are made; notifications wait
/// until the edit completes.
pub struct Editor<'a, T> {
    state: &'a mut StoreState<T>,
    parallel: &'a ParallelFilter,
    behavior: ScrollingBehavior,
    window: ViewWindow,
    view_changed: bool,
    /// Pre-edit contents, saved by the first `clear` for rollback.
    backup: Option<(Vec<Record<T>>, Vec<Record<T>>)>,
}

impl<'a, T: LogItem> Editor<'a, T> {
    fn new(state: &'a mut StoreState<T>, parallel: &'a ParallelFilter, behavior: ScrollingBehavior) -> Self {
        let window = state.window;
        Self {
            state,
            parallel,
            behavior,
            window,
            view_changed: false,
            backup: None,
        }
    }

    /// Append one item.
    pub fn append(&mut self, item: T) -> AppendOutcome {
        let number = self.state.next_number();
        if let Some(last) = self.state.original.last() {
            if item.time() < last.time() {
                tracing::debug!(target: targets::STORE, %number, "record appended out of time order");
            }
        }

        let record = Record::new(number, item);
        let accepted = self.state.filter.check(record.item());
        self.state.original.push(record.clone());

        let filtered_index = accepted.then(|| {
            let insertion_index = self.state.filtered.len();
            self.state.filtered.push(record);
            self.note_appended(1, insertion_index);
            insertion_index
        });

        AppendOutcome {
            number,
            filtered_index,
        }
    }

    /// Append several items as one contiguous number range.
    pub fn append_batch<I>(&mut self, items: I) -> Range<RecordNumber>
    where
        I: IntoIterator<Item = T>,
    {
        let first = self.state.next_number();
        let records: Vec<Record<T>> = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| Record::new(RecordNumber(first.0 + i as u64), item))
            .collect();
        let end = RecordNumber(first.0 + records.len() as u64);

        let filter = &self.state.filter;
        let accepted = self.parallel.filter(&records, |record| filter.check(record.item()));
        self.state.original.extend(records);

        if !accepted.is_empty() {
            let insertion_index = self.state.filtered.len();
            let count = accepted.len();
            self.state.filtered.extend(accepted);
            self.note_appended(count, insertion_index);
        }

        first..end
    }

    /// Mid-sequence insertion is not supported.
    ///
    /// Always returns [`LogListError::Unsupported`] and leaves the store untouched.
    pub fn insert(&mut self, _item: T) -> Result<()> {
        tracing::error!(target: targets::STORE, "mid-sequence insert is not supported");
        Err(LogListError::unsupported("insert"))
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        let original = std::mem::take(&mut self.state.original);
        let filtered = std::mem::take(&mut self.state.filtered);
        if self.backup.is_none() {
            self.backup = Some((original, filtered));
        }
        self.window = self.window.with_offset(0);
        self.view_changed = true;
    }

    /// The window as it will be after this edit.
    pub fn window(&self) -> ViewWindow {
        self.window
    }

    /// Number of records currently in the store.
    pub fn len(&self) -> usize {
        self.state.original.len()
    }

    /// Whether the store currently holds no records.
    pub fn is_empty(&self) -> bool {
        self.state.original.is_empty()
    }

    fn note_appended(&mut self, count: usize, insertion_index: usize) {
        let offset = self.behavior.append_offset(count, insertion_index, self.window);
        let invisible = offset == self.window.offset && insertion_index > self.window.end();
        self.view_changed |= !invisible;
        self.window = self.window.with_offset(offset);
    }

    fn finish(self) -> EditSummary {
        EditSummary {
            view_changed: self.view_changed,
            window: self.window,
            cleared: self.backup.is_some(),
        }
    }

    fn rollback(self, checkpoint: Checkpoint) {
        if let Some((original, filtered)) = self.backup {
            self.state.original = original;
            self.state.filtered = filtered;
        }
        self.state.original.truncate(checkpoint.original_len);
        self.state.filtered.truncate(checkpoint.filtered_len);
        self.state.window = checkpoint.window;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filters;
    use crate::tests_support::Probe;

    static_assertions::assert_impl_all!(LogStore<Probe>: Send, Sync);

    fn recorder<A: Clone + Send + 'static>(signal: &Signal<A>) -> Arc<Mutex<Vec<A>>> {
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();
        signal.connect(move |value: &A| received_clone.lock().push(value.clone()));
        received
    }

    #[test]
    fn test_numbers_start_at_zero() {
        let store = LogStore::new();
        let first = store.append(Probe::at(1), ScrollingBehavior::PreservePosition, false);
        let second = store.append(Probe::at(2), ScrollingBehavior::PreservePosition, false);
        assert_eq!(first.number, RecordNumber(0));
        assert_eq!(second.number, RecordNumber(1));
        assert_eq!(second.filtered_index, Some(1));
        assert_eq!(store.last_number(), Some(RecordNumber(1)));
    }

    #[test]
    fn test_append_rejected_by_filter() {
        let store = LogStore::new();
        store.apply_filter(Some(Filters::by_string("keep")), ScrollingBehavior::PreservePosition, false);

        let outcome = store.append(Probe::text(0, "drop me"), ScrollingBehavior::PreservePosition, false);
        assert_eq!(outcome.filtered_index, None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.filtered_len(), 0);
    }

    #[test]
    fn test_invisible_append_emits_nothing() {
        let store = LogStore::new();
        store.append_batch((0..40).map(Probe::at), ScrollingBehavior::PreservePosition, false);
        let requests = recorder(store.presentation_requests());

        // Window is 0 -> 16; index 40 lies beyond it.
        store.append(Probe::at(40), ScrollingBehavior::PreservePosition, true);
        assert!(requests.lock().is_empty());

        store.append(Probe::at(41), ScrollingBehavior::ScrollToNew, true);
        assert_eq!(
            *requests.lock(),
            vec![PresentationRequest::new(ViewWindow::new(26, 16), true)]
        );
    }

    #[test]
    fn test_append_right_after_window_is_visible() {
        let store = LogStore::new();
        store.append_batch((0..16).map(Probe::at), ScrollingBehavior::PreservePosition, false);
        let requests = recorder(store.presentation_requests());

        // Insertion index 16 equals offset + size: not strictly past it.
        store.append(Probe::at(16), ScrollingBehavior::PreservePosition, false);
        assert_eq!(requests.lock().len(), 1);
    }

    #[test]
    fn test_filtered_size_is_deduplicated() {
        let store = LogStore::new();
        let sizes = recorder(store.filtered_set_size());

        store.append(Probe::text(0, "a"), ScrollingBehavior::PreservePosition, false);
        store.append(Probe::text(1, "b"), ScrollingBehavior::PreservePosition, false);
        store.apply_filter(None, ScrollingBehavior::PreservePosition, false);
        store.apply_filter(Some(Filters::by_string("a")), ScrollingBehavior::PreservePosition, false);

        assert_eq!(*sizes.lock(), vec![1, 2, 1]);
    }

    #[test]
    fn test_clear_resets_numbering_and_window() {
        let store = LogStore::new();
        store.append_batch((0..100).map(Probe::at), ScrollingBehavior::ScrollToNew, false);
        assert_eq!(store.current_window(), ViewWindow::new(84, 16));
        let requests = recorder(store.presentation_requests());

        store.clear();
        assert_eq!(
            *requests.lock(),
            vec![PresentationRequest::new(ViewWindow::new(0, 16), false)]
        );

        let outcome = store.append(Probe::at(0), ScrollingBehavior::ScrollToNew, false);
        assert_eq!(outcome.number, RecordNumber(0));
        assert_eq!(store.current_window().offset, 0);
    }

    #[test]
    fn test_edit_emits_once() {
        let store = LogStore::new();
        let requests = recorder(store.presentation_requests());

        let range = store
            .edit(
                |editor| {
                    editor.append(Probe::at(0));
                    editor.append(Probe::at(1));
                    Ok(editor.append_batch((2..10).map(Probe::at)))
                },
                ScrollingBehavior::ScrollToNew,
                true,
            )
            .unwrap();

        assert_eq!(range, RecordNumber(2)..RecordNumber(10));
        assert_eq!(requests.lock().len(), 1);
    }

    #[test]
    fn test_edit_rolls_back_on_error() {
        let store = LogStore::new();
        store.append_batch((0..5).map(Probe::at), ScrollingBehavior::PreservePosition, false);
        store.toggle_selection(RecordNumber(2));
        let requests = recorder(store.presentation_requests());
        let sizes = recorder(store.filtered_set_size());

        let result: Result<()> = store.edit(
            |editor| {
                editor.append(Probe::at(5));
                editor.clear();
                editor.append(Probe::at(6));
                editor.insert(Probe::at(7))
            },
            ScrollingBehavior::ScrollToNew,
            false,
        );

        assert_eq!(result, Err(LogListError::unsupported("insert")));
        assert_eq!(store.len(), 5);
        assert_eq!(store.filtered_len(), 5);
        assert_eq!(store.last_number(), Some(RecordNumber(4)));
        assert_eq!(store.selection(), vec![RecordNumber(2)]);
        assert!(requests.lock().is_empty());
        assert!(sizes.lock().is_empty());
    }

    #[test]
    fn test_present_clamps() {
        let store = LogStore::new();
        store.append_batch((0..5).map(Probe::at), ScrollingBehavior::PreservePosition, false);

        assert!(store.present(ViewWindow::new(10, 20)).is_empty());
        assert_eq!(store.current_window(), ViewWindow::new(10, 20));

        let tail = store.present(ViewWindow::new(3, 20));
        let numbers: Vec<_> = tail.iter().map(Record::number).collect();
        assert_eq!(numbers, vec![RecordNumber(3), RecordNumber(4)]);
    }

    #[test]
    fn test_closest_index_resolves_against_filtered_set() {
        let store = LogStore::new();
        assert_eq!(store.closest_index_of(RecordNumber(3)), None);

        let text = |n: u64| if (10..50).contains(&n) { "keep" } else { "drop" };
        store.append_batch((0..100).map(|n| Probe::text(n, text(n))), ScrollingBehavior::PreservePosition, false);
        store.apply_filter(Some(Filters::by_string("keep")), ScrollingBehavior::PreservePosition, false);

        assert_eq!(store.closest_index_of(RecordNumber(12)), Some(2));
        assert_eq!(store.closest_index_of(RecordNumber(80)), Some(39));
        assert_eq!(store.closest_index_of(RecordNumber(2)), Some(0));
    }

    #[test]
    fn test_selection_signals() {
        let store = LogStore::new();
        store.append_batch((0..10).map(Probe::at), ScrollingBehavior::PreservePosition, false);
        let selections = recorder(store.selection_changed());

        store.select(RecordNumber(3));
        store.extend_selection(RecordNumber(5));
        store.clear_selection();
        store.clear_selection();

        assert_eq!(
            *selections.lock(),
            vec![
                vec![RecordNumber(3)],
                vec![RecordNumber(3), RecordNumber(4), RecordNumber(5)],
                vec![],
            ]
        );
    }

    #[test]
    fn test_clear_clears_selection() {
        let store = LogStore::new();
        store.append_batch((0..3).map(Probe::at), ScrollingBehavior::PreservePosition, false);
        store.select(RecordNumber(1));
        store.clear();
        assert!(store.selection().is_empty());
    }
}
