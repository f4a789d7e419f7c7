//! Typed notification ports.
//!
//! The record store announces presentation requests and filtered-set sizes
//! through a [`Signal`], as does the scroller for its own window requests.
//! The presenter subscribes with closures that only enqueue onto a
//! [`Dispatcher`](crate::Dispatcher); nothing heavier should run in a slot,
//! because slots execute on whichever thread called [`Signal::emit`].
//!
//! ```
//! use horizon_loglist_core::Signal;
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//!
//! let sizes = Signal::<usize>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let id = sizes.connect(move |&n| sink.lock().push(n));
//!
//! sizes.emit(3);
//! sizes.disconnect(id);
//! sizes.emit(4);
//! assert_eq!(*seen.lock(), [3]);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// Handle to one subscription on a [`Signal`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Fan-out of `Args` values to subscribed closures.
///
/// Emitting and subscribing may happen on different threads.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    muted: AtomicBool,
    delivered: AtomicU64,
}

impl<Args: Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// A signal with no subscribers.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
            muted: AtomicBool::new(false),
            delivered: AtomicU64::new(0),
        }
    }

    /// Subscribe `slot`; keep the id to unsubscribe.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.slots.lock().insert(Arc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Unsubscribe. `false` when `id` was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// [`disconnect`](Self::disconnect) with a stale id reported as an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        self.disconnect(id)
            .then_some(())
            .ok_or(SignalError::InvalidConnection)
    }

    /// Drop every subscription.
    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    /// Number of live subscriptions.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// How many emissions reached at least one slot.
    pub fn emission_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Mute or unmute. A muted signal drops every emitted value.
    pub fn set_blocked(&self, blocked: bool) {
        self.muted.store(blocked, Ordering::SeqCst);
    }

    /// Whether the signal is muted.
    pub fn is_blocked(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    /// Deliver `args` to every slot in subscription order.
    ///
    /// Slots run on a snapshot taken outside the lock, so a slot may
    /// subscribe or unsubscribe on this same signal.
    #[tracing::instrument(skip_all, target = "horizon_loglist_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "muted, value dropped");
            return;
        }

        let snapshot: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        if snapshot.is_empty() {
            return;
        }
        tracing::trace!(target: targets::SIGNAL, slots = snapshot.len(), "delivering");
        self.delivered.fetch_add(1, Ordering::Relaxed);

        snapshot.iter().for_each(|slot| slot(&args));
    }

    /// Subscribe for as long as the returned guard lives.
    pub fn connect_scoped<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            id: self.connect(slot),
            signal: Arc::downgrade(self),
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .field("muted", &self.muted.load(Ordering::Relaxed))
            .finish()
    }
}

/// Unsubscribes on drop. Outliving the signal is harmless.
///
/// ```
/// use horizon_loglist_core::Signal;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let requests = Arc::new(Signal::<usize>::new());
/// let total = Arc::new(AtomicUsize::new(0));
///
/// let guard = {
///     let total = Arc::clone(&total);
///     requests.connect_scoped(move |&n| {
///         total.fetch_add(n, Ordering::Relaxed);
///     })
/// };
/// requests.emit(5);
/// drop(guard);
/// requests.emit(7);
/// assert_eq!(total.load(Ordering::Relaxed), 5);
/// ```
pub struct ConnectionGuard<Args: Send + 'static> {
    signal: Weak<Signal<Args>>,
    id: ConnectionId,
}

impl<Args: Send + 'static> ConnectionGuard<Args> {
    /// The guarded subscription.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: Send + 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.disconnect(self.id);
        }
    }
}

impl<Args: Send + 'static> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConnectionGuard").field(&self.id).finish()
    }
}

static_assertions::assert_impl_all!(Signal<usize>: Send, Sync);
