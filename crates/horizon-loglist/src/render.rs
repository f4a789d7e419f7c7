//! The rendering collaborator and the bookkeeping it needs.
//!
//! A [`Renderer`] turns transitions into on-screen changes. It is handed a
//! [`TransitionPlan`] through [`apply_plan`]; how it animates is its own
//! business. [`ContainerArena`] is a ready-made store for whatever per-record
//! resource a renderer keeps (widgets, text layouts, GPU handles).

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::reconcile::{TransitionKind, TransitionPlan};
use crate::record::{Record, RecordNumber};

/// Receives the visual effect of each transition.
///
/// Rows are window-relative and may be negative or past the window end for
/// records sliding in or out.
pub trait Renderer<T> {
    /// Build a container for `record`, placed at `row`.
    fn create(&mut self, record: &Record<T>, row: isize);

    /// Move the container of `record` from row `from` to row `to`.
    ///
    /// With `remove_after` the container is discarded once the move ends.
    fn move_to(&mut self, record: &Record<T>, from: isize, to: isize, remove_after: bool, animate: bool);

    /// Reveal a freshly created container in place.
    fn fade_in(&mut self, record: &Record<T>, animate: bool);

    /// Hide and discard the container of `record`.
    fn fade_out(&mut self, record: &Record<T>, animate: bool);

    /// Place a visible container at `y` pixels below the viewport top.
    ///
    /// Called for every visible record after a scroll or a presentation.
    fn position(&mut self, _record: &Record<T>, _y: f64) {}
}

/// Drive `renderer` through `plan`.
///
/// Containers for every new record are created before any transition runs.
pub fn apply_plan<T, R>(plan: &TransitionPlan<T>, renderer: &mut R, animate: bool)
where
    R: Renderer<T> + ?Sized,
{
    for transition in plan.transitions().iter().filter(|t| t.kind.is_new()) {
        renderer.create(&transition.record, transition.to);
    }

    for transition in plan.transitions() {
        match transition.kind {
            TransitionKind::Insert => renderer.fade_in(&transition.record, animate),
            TransitionKind::Delete => renderer.fade_out(&transition.record, animate),
            TransitionKind::RemoveAfterMove => {
                renderer.move_to(&transition.record, transition.from, transition.to, true, animate);
            }
            TransitionKind::Move | TransitionKind::Enter => {
                renderer.move_to(&transition.record, transition.from, transition.to, false, animate);
            }
        }
    }
}

new_key_type! {
    /// Key of a container in a [`ContainerArena`].
    pub struct ContainerId;
}

/// Per-record containers, addressable by record number.
pub struct ContainerArena<C> {
    containers: SlotMap<ContainerId, C>,
    by_number: HashMap<RecordNumber, ContainerId>,
}

impl<C> Default for ContainerArena<C> {
    fn default() -> Self {
        Self {
            containers: SlotMap::with_key(),
            by_number: HashMap::new(),
        }
    }
}

impl<C> ContainerArena<C> {
    /// An empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `container` for `number`, returning the one it replaces.
    pub fn insert(&mut self, number: RecordNumber, container: C) -> Option<C> {
        let id = self.containers.insert(container);
        self.by_number
            .insert(number, id)
            .and_then(|previous| self.containers.remove(previous))
    }

    /// The container of record `number`.
    pub fn get(&self, number: RecordNumber) -> Option<&C> {
        self.by_number.get(&number).and_then(|&id| self.containers.get(id))
    }

    /// The container of record `number`, mutably.
    pub fn get_mut(&mut self, number: RecordNumber) -> Option<&mut C> {
        self.by_number
            .get(&number)
            .and_then(|&id| self.containers.get_mut(id))
    }

    /// Key of the container for `number`.
    pub fn id_of(&self, number: RecordNumber) -> Option<ContainerId> {
        self.by_number.get(&number).copied()
    }

    /// Take out the container of record `number`.
    pub fn remove(&mut self, number: RecordNumber) -> Option<C> {
        self.by_number
            .remove(&number)
            .and_then(|id| self.containers.remove(id))
    }

    /// Whether record `number` has a container.
    pub fn contains(&self, number: RecordNumber) -> bool {
        self.by_number.contains_key(&number)
    }

    /// Number of containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether the arena holds no containers.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Iterate `(number, container)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordNumber, &C)> {
        self.by_number
            .iter()
            .filter_map(|(&number, &id)| self.containers.get(id).map(|c| (number, c)))
    }

    /// Drop every container.
    pub fn clear(&mut self) {
        self.containers.clear();
        self.by_number.clear();
    }
}

impl<C> std::fmt::Debug for ContainerArena<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerArena")
            .field("len", &self.containers.len())
            .finish()
    }
}
