//! Thread affinity checks for UI-side state.
//!
//! The presenter owns the scroller, the reconciler and the renderer, all of
//! which must only be touched from the thread that created them. Producers
//! on other threads talk to it through the [`Dispatcher`](crate::Dispatcher).
//!
//! ```
//! use horizon_loglist_core::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! affinity.assert_same_thread();
//! ```

use std::thread::{self, ThreadId};

/// The thread a value was created on, checked on later access.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    /// The owning thread.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.owner
    }

    /// Whether the calling thread is the owner.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic unless called on the owning thread. Active in release builds.
    #[inline]
    pub fn assert_same_thread(&self) {
        self.assert_same_thread_with_msg("UI state accessed from wrong thread");
    }

    /// Like [`assert_same_thread`](Self::assert_same_thread) with a caller
    /// supplied message.
    pub fn assert_same_thread_with_msg(&self, msg: &str) {
        if !self.is_same_thread() {
            wrong_thread(self.owner, msg);
        }
    }

    /// Checked only with `debug_assertions`.
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        if cfg!(debug_assertions) {
            self.assert_same_thread();
        }
    }
}

#[cold]
#[inline(never)]
fn wrong_thread(owner: ThreadId, msg: &str) -> ! {
    let caller = thread::current();
    panic!(
        "{msg}: owned by {owner:?}, called from {:?} ({:?}); post through the dispatcher instead",
        caller.name().unwrap_or("<unnamed>"),
        caller.id(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_thread_passes() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread();
        affinity.debug_assert_same_thread();
    }

    #[test]
    fn test_other_thread_is_detected() {
        let affinity = ThreadAffinity::current();
        let seen = thread::spawn(move || affinity.is_same_thread()).join();
        assert_eq!(seen.ok(), Some(false));
    }

    #[test]
    fn test_other_thread_panics() {
        let affinity = ThreadAffinity::current();
        let result = thread::Builder::new()
            .name("producer".into())
            .spawn(move || affinity.assert_same_thread_with_msg("store view touched"))
            .map(|handle| handle.join());
        assert!(matches!(result, Ok(Err(_))));
    }

    #[test]
    fn test_copies_share_owner() {
        let affinity = ThreadAffinity::default();
        let copy = affinity;
        assert_eq!(affinity.thread_id(), copy.thread_id());
    }
}
