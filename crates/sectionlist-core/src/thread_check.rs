//! Thread affinity checks for UI-thread-only code.
//!
//! The adapter and the UI queue must be driven from the thread that created
//! them. [`ThreadAffinity`] records that thread and offers assertions for code
//! paths that must only run there.
//!
//! ```
//! use sectionlist_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.is_same_thread());
//! affinity.debug_assert_same_thread();
//! ```

use std::thread::ThreadId;

/// Thread affinity tracker.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert that we are on the bound thread, with a custom message.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    pub fn assert_same_thread_with_msg(&self, msg: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(msg);
        }
    }

    /// Debug-only assertion that we are on the bound thread.
    ///
    /// This is a no-op in release builds.
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread_with_msg("UI-thread object accessed from wrong thread");
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str) -> ! {
        let current = std::thread::current();
        panic!(
            "{msg}: expected thread {:?}, current thread \"{}\" ({:?})",
            self.thread_id,
            current.name().unwrap_or("<unnamed>"),
            current.id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread_with_msg("should not panic");
        assert_eq!(affinity.thread_id(), std::thread::current().id());
    }

    #[test]
    fn test_other_thread_detected() {
        let affinity = ThreadAffinity::current();
        let same = std::thread::spawn(move || affinity.is_same_thread())
            .join()
            .unwrap();
        assert!(!same);
    }

    #[test]
    fn test_other_thread_panics() {
        let affinity = ThreadAffinity::current();
        let result = std::thread::spawn(move || {
            affinity.assert_same_thread_with_msg("wrong thread");
        })
        .join();
        assert!(result.is_err());
    }
}
