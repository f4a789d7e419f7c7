//! Single-consumer message queue for the UI thread.
//!
//! Producers on any thread post messages through a [`DispatchHandle`]; the
//! owning thread drains them in FIFO order with
//! [`Dispatcher::process_pending`]. Nothing posted is ever dropped while the
//! dispatcher is alive.
//!
//! # Example
//!
//! ```
//! use horizon_loglist_core::Dispatcher;
//!
//! let dispatcher = Dispatcher::<u32>::new();
//! let handle = dispatcher.handle();
//!
//! std::thread::spawn(move || {
//!     handle.post(7).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! let mut seen = Vec::new();
//! dispatcher.process_pending(|msg| seen.push(msg));
//! assert_eq!(seen, vec![7]);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::error::DispatchError;
use crate::logging::targets;
use crate::thread_check::ThreadAffinity;

/// A unique identifier for a posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    /// Get the raw u64 value of this message ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

struct Envelope<M> {
    id: MessageId,
    message: M,
}

/// The receiving end of the UI queue.
///
/// A dispatcher is bound to the thread that created it; draining it from any
/// other thread panics.
pub struct Dispatcher<M> {
    receiver: Receiver<Envelope<M>>,
    sender: Sender<Envelope<M>>,
    next_id: Arc<AtomicU64>,
    affinity: ThreadAffinity,
}

impl<M: Send + 'static> Dispatcher<M> {
    /// Create a dispatcher owned by the current thread.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            receiver,
            sender,
            next_id: Arc::new(AtomicU64::new(1)),
            affinity: ThreadAffinity::current(),
        }
    }

    /// Get a cloneable, thread-safe handle for posting messages.
    pub fn handle(&self) -> DispatchHandle<M> {
        DispatchHandle {
            sender: self.sender.clone(),
            next_id: self.next_id.clone(),
        }
    }

    /// Number of messages waiting to be processed.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Check if there are any pending messages.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Pop the next message, if any.
    pub fn try_next(&self) -> Option<M> {
        self.affinity.assert_same_thread_with_msg("dispatcher drained from wrong thread");
        match self.receiver.try_recv() {
            Ok(envelope) => {
                tracing::trace!(target: targets::DISPATCH, id = envelope.id.as_u64(), "dispatching message");
                Some(envelope.message)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Process every pending message in FIFO order.
    ///
    /// Messages posted by `handler` itself are processed in the same call.
    /// Returns the number of messages processed.
    pub fn process_pending<F>(&self, mut handler: F) -> usize
    where
        F: FnMut(M),
    {
        let mut count = 0;
        while let Some(message) = self.try_next() {
            handler(message);
            count += 1;
        }
        if count > 0 {
            tracing::debug!(target: targets::DISPATCH, count, "processed pending messages");
        }
        count
    }
}

impl<M: Send + 'static> Default for Dispatcher<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// The sending end of a [`Dispatcher`].
pub struct DispatchHandle<M> {
    sender: Sender<Envelope<M>>,
    next_id: Arc<AtomicU64>,
}

impl<M> Clone for DispatchHandle<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

impl<M: Send + 'static> DispatchHandle<M> {
    /// Post a message to the UI queue.
    ///
    /// Fails only when the dispatcher has been dropped.
    pub fn post(&self, message: M) -> Result<MessageId, DispatchError> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sender
            .send(Envelope { id, message })
            .map_err(|_| DispatchError::Disconnected)?;
        Ok(id)
    }
}

static_assertions::assert_impl_all!(DispatchHandle<u32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_fifo() {
        let dispatcher = Dispatcher::new();
        let handle = dispatcher.handle();

        for i in 0..10 {
            handle.post(i).unwrap();
        }
        assert_eq!(dispatcher.pending_count(), 10);

        let mut seen = Vec::new();
        assert_eq!(dispatcher.process_pending(|m| seen.push(m)), 10);
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        assert!(!dispatcher.has_pending());
    }

    #[test]
    fn test_message_ids_increase() {
        let dispatcher = Dispatcher::<()>::new();
        let handle = dispatcher.handle();
        let first = handle.post(()).unwrap();
        let second = handle.clone().post(()).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_post_after_drop_fails() {
        let dispatcher = Dispatcher::<u8>::new();
        let handle = dispatcher.handle();
        drop(dispatcher);
        assert_eq!(handle.post(1), Err(DispatchError::Disconnected));
    }

    #[test]
    fn test_post_from_other_threads() {
        let dispatcher = Dispatcher::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let handle = dispatcher.handle();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        handle.post(t * 100 + i).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut seen = Vec::new();
        dispatcher.process_pending(|m| seen.push(m));
        assert_eq!(seen.len(), 100);

        // Per-producer order survives interleaving.
        for t in 0..4 {
            let ours: Vec<_> = seen.iter().copied().filter(|m| m / 100 == t).collect();
            assert!(ours.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_handler_may_post() {
        let dispatcher = Dispatcher::new();
        let handle = dispatcher.handle();
        handle.post(3u32).unwrap();

        let mut seen = Vec::new();
        dispatcher.process_pending(|m| {
            seen.push(m);
            if m > 0 {
                handle.post(m - 1).unwrap();
            }
        });
        assert_eq!(seen, vec![3, 2, 1, 0]);
    }
}
