//! Transition planning between two consecutive visible windows.
//!
//! Given the records shown last time and the records to show now,
//! [`reconcile`] classifies every record into a [`Transition`]: kept records
//! move to their new row, records that leave the window slide off its top or
//! bottom edge, records that vanish from inside the window fade out, and new
//! records either slide in from an edge or fade in at their row.
//!
//! Records are matched by [`RecordNumber`], never by payload.

use std::collections::{HashMap, HashSet};
use std::fmt;

use horizon_loglist_core::logging::targets;

use crate::record::{LogItem, Record, RecordNumber};

/// How a record gets from its old row to its new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Present before and after; slides from `from` to `to`.
    Move,
    /// Leaves through an edge; slides to `to` and is then removed.
    RemoveAfterMove,
    /// Vanished from inside the window; fades out at `from`.
    Delete,
    /// New, adjacent to an edge; slides in from the off-window row `from`.
    Enter,
    /// New, between records that stay; fades in at `to`.
    Insert,
}

impl TransitionKind {
    /// Whether the record needs a freshly created container.
    pub fn is_new(self) -> bool {
        matches!(self, Self::Enter | Self::Insert)
    }

    /// Whether the record is still visible after the transition.
    pub fn is_visible_after(self) -> bool {
        !matches!(self, Self::Delete | Self::RemoveAfterMove)
    }
}

/// One record's change of row.
///
/// Rows are relative to the window; negative rows and rows at or past the
/// window size are off-screen.
pub struct Transition<T> {
    /// The record being moved.
    pub record: Record<T>,
    /// Row before the transition.
    pub from: isize,
    /// Row after the transition.
    pub to: isize,
    pub kind: TransitionKind,
}

impl<T> Transition<T> {
    fn new(record: Record<T>, from: isize, to: isize, kind: TransitionKind) -> Self {
        Self { record, from, to, kind }
    }

    /// Number of the record.
    pub fn number(&self) -> RecordNumber {
        self.record.number()
    }
}

impl<T> Clone for Transition<T> {
    fn clone(&self) -> Self {
        Self::new(self.record.clone(), self.from, self.to, self.kind)
    }
}

impl<T> PartialEq for Transition<T> {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
            && self.from == other.from
            && self.to == other.to
            && self.kind == other.kind
    }
}

impl<T> Eq for Transition<T> {}

impl<T> fmt::Debug for Transition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("number", &self.record.number())
            .field("from", &self.from)
            .field("to", &self.to)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Transition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = &self.record;
        match self.kind {
            TransitionKind::Enter | TransitionKind::Insert => write!(f, "+ {}  {record}", self.to),
            TransitionKind::Delete => write!(f, "- {}  {record}", self.from),
            TransitionKind::Move | TransitionKind::RemoveAfterMove => {
                write!(f, "{} -> {}  {record}", self.from, self.to)
            }
        }
    }
}

/// The ordered transitions of one reconciliation.
pub struct TransitionPlan<T> {
    transitions: Vec<Transition<T>>,
    window_size: usize,
}

impl<T> TransitionPlan<T> {
    /// All transitions: leaving-top, kept and deleted, leaving-bottom, new.
    pub fn transitions(&self) -> &[Transition<T>] {
        &self.transitions
    }

    /// Window size the plan was computed for.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether nothing changes between the two windows.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Iterate transitions of one kind.
    pub fn of_kind(&self, kind: TransitionKind) -> impl Iterator<Item = &Transition<T>> {
        self.transitions.iter().filter(move |t| t.kind == kind)
    }

    /// Records visible once the plan is applied, ordered by target row.
    pub fn visible(&self) -> Vec<Record<T>> {
        let mut visible: Vec<&Transition<T>> = self
            .transitions
            .iter()
            .filter(|t| t.kind.is_visible_after())
            .collect();
        visible.sort_by_key(|t| t.to);
        visible.into_iter().map(|t| t.record.clone()).collect()
    }
}

impl<T> fmt::Debug for TransitionPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionPlan")
            .field("window_size", &self.window_size)
            .field("transitions", &self.transitions)
            .finish()
    }
}

enum Stage {
    Top,
    Tail,
}

/// Compute the transitions that turn `old` into `new`.
#[tracing::instrument(skip_all, target = "horizon_loglist::reconcile", level = "trace")]
pub fn reconcile<T: LogItem>(old: &[Record<T>], new: &[Record<T>], window_size: usize) -> TransitionPlan<T> {
    let new_index: HashMap<RecordNumber, usize> = new
        .iter()
        .enumerate()
        .map(|(i, record)| (record.number(), i))
        .collect();
    let old_numbers: HashSet<RecordNumber> = old.iter().map(Record::number).collect();

    let mut top = Vec::new();
    let mut middle = Vec::new();
    let mut bottom: Vec<Transition<T>> = Vec::new();
    let mut stage = Stage::Top;

    for (i, record) in old.iter().enumerate() {
        let from = i as isize;
        match (&stage, new_index.get(&record.number())) {
            (Stage::Top, None) => {
                top.push(Transition::new(record.clone(), from, 0, TransitionKind::RemoveAfterMove));
            }
            (Stage::Top, Some(&to)) => {
                middle.push(Transition::new(record.clone(), from, to as isize, TransitionKind::Move));
                stage = Stage::Tail;
            }
            (Stage::Tail, None) => {
                bottom.push(Transition::new(record.clone(), from, 0, TransitionKind::RemoveAfterMove));
            }
            (Stage::Tail, Some(&to)) => {
                middle.extend(bottom.drain(..).map(|pending| {
                    let from = pending.from;
                    Transition::new(pending.record, from, from, TransitionKind::Delete)
                }));
                middle.push(Transition::new(record.clone(), from, to as isize, TransitionKind::Move));
            }
        }
    }

    let top_count = top.len();
    for (i, transition) in top.iter_mut().enumerate() {
        transition.to = i as isize - top_count as isize;
    }
    for (i, transition) in bottom.iter_mut().enumerate() {
        transition.to = (window_size + i) as isize;
    }

    let added = added_transitions(old, new, &old_numbers, window_size);

    let mut transitions = top;
    transitions.append(&mut middle);
    transitions.append(&mut bottom);
    transitions.extend(added);

    tracing::trace!(
        target: targets::RECONCILE,
        old = old.len(),
        new = new.len(),
        transitions = transitions.len(),
        "reconciled window"
    );
    TransitionPlan { transitions, window_size }
}

/// Transitions for records of `new` absent from `old`: entering from the
/// top, inserted, entering from the bottom.
fn added_transitions<T: LogItem>(
    old: &[Record<T>],
    new: &[Record<T>],
    old_numbers: &HashSet<RecordNumber>,
    window_size: usize,
) -> Vec<Transition<T>> {
    let added = new
        .iter()
        .enumerate()
        .filter(|(_, record)| !old_numbers.contains(&record.number()));

    let (Some(first), Some(last)) = (old.first(), old.last()) else {
        return added
            .map(|(to, record)| Transition::new(record.clone(), to as isize, to as isize, TransitionKind::Insert))
            .collect();
    };
    let (top_key, bottom_key) = (first.sort_key(), last.sort_key());

    let mut top_new = Vec::new();
    let mut inserted = Vec::new();
    let mut bottom_new = Vec::new();
    for (to, record) in added {
        let key = record.sort_key();
        if key < top_key {
            top_new.push((to, record));
        } else if key > bottom_key {
            bottom_new.push((to, record));
        } else {
            inserted.push(Transition::new(record.clone(), to as isize, to as isize, TransitionKind::Insert));
        }
    }

    let top_new_count = top_new.len() as isize;
    let mut transitions: Vec<Transition<T>> = top_new
        .into_iter()
        .enumerate()
        .map(|(k, (to, record))| {
            Transition::new(record.clone(), k as isize - top_new_count, to as isize, TransitionKind::Enter)
        })
        .collect();
    transitions.append(&mut inserted);
    transitions.extend(bottom_new.into_iter().enumerate().map(|(k, (to, record))| {
        Transition::new(record.clone(), (window_size + k) as isize, to as isize, TransitionKind::Enter)
    }));
    transitions
}

/// Keeps the records currently shown and plans transitions against them.
pub struct Reconciler<T> {
    visible: Vec<Record<T>>,
}

impl<T> Default for Reconciler<T> {
    fn default() -> Self {
        Self { visible: Vec::new() }
    }
}

impl<T: LogItem> Reconciler<T> {
    /// A reconciler with nothing shown yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan the move from the current visible records to `new`.
    pub fn reconcile(&self, new: &[Record<T>], window_size: usize) -> TransitionPlan<T> {
        reconcile(&self.visible, new, window_size)
    }

    /// Adopt the plan's outcome as the visible records.
    pub fn commit(&mut self, plan: &TransitionPlan<T>) {
        self.visible = plan.visible();
    }

    /// Forget the visible records.
    pub fn reset(&mut self) {
        self.visible.clear();
    }

    /// The records currently shown, top to bottom.
    pub fn visible(&self) -> &[Record<T>] {
        &self.visible
    }
}

impl<T> fmt::Debug for Reconciler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numbers: Vec<RecordNumber> = self.visible.iter().map(Record::number).collect();
        f.debug_struct("Reconciler").field("visible", &numbers).finish()
    }
}
