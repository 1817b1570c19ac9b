//! UI-thread dispatch.
//!
//! Background work never touches view-facing state directly. Instead it posts
//! a closure to the interactive thread's [`UiQueue`] through a cloneable
//! [`UiHandle`]; the owning thread drains the queue from its event loop (or,
//! in tests, with [`UiQueue::process_until`]).
//!
//! # Example
//!
//! ```
//! use sectionlist_core::dispatch::UiQueue;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let queue = UiQueue::new();
//! let handle = queue.handle();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let hits_clone = hits.clone();
//! std::thread::spawn(move || {
//!     handle.post(move || { hits_clone.fetch_add(1, Ordering::SeqCst); }).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(queue.process_pending(), 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::error::DispatchError;
use crate::logging::{PerfSpan, span_names, targets};
use crate::thread_check::ThreadAffinity;

/// Longest single wait inside [`UiQueue::process_until`].
const POLL_SLICE: Duration = Duration::from_millis(5);

/// A type-erased closure queued for execution on the UI thread.
pub struct QueuedInvocation {
    invoke: Box<dyn FnOnce() + Send>,
}

impl QueuedInvocation {
    /// Wrap a closure for deferred execution.
    pub fn new<F>(invoke: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            invoke: Box::new(invoke),
        }
    }

    /// Execute the invocation.
    pub fn execute(self) {
        (self.invoke)();
    }
}

impl std::fmt::Debug for QueuedInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedInvocation").finish_non_exhaustive()
    }
}

/// The interactive thread's inbox.
///
/// Created on, and drained only from, the UI thread.
#[derive(Debug)]
pub struct UiQueue {
    sender: Sender<QueuedInvocation>,
    receiver: Receiver<QueuedInvocation>,
    affinity: ThreadAffinity,
}

impl Default for UiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UiQueue {
    /// Create a queue bound to the current thread.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            affinity: ThreadAffinity::current(),
        }
    }

    /// Get a handle that any thread can use to post work to this queue.
    pub fn handle(&self) -> UiHandle {
        UiHandle {
            sender: self.sender.clone(),
        }
    }

    /// Check if there are any pending invocations.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Get the number of pending invocations.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Run every invocation queued at the time of the call.
    ///
    /// Invocations posted while draining are left for the next call.
    /// Returns the number of invocations executed.
    pub fn process_pending(&self) -> usize {
        self.process_batch(self.receiver.len())
    }

    /// Run up to `max` queued invocations.
    ///
    /// Returns the number of invocations executed.
    pub fn process_batch(&self, max: usize) -> usize {
        self.affinity.debug_assert_same_thread();
        if max == 0 {
            return 0;
        }

        let _span = PerfSpan::new(span_names::DISPATCH);
        let mut processed = 0;
        while processed < max {
            match self.receiver.try_recv() {
                Ok(invocation) => {
                    invocation.execute();
                    processed += 1;
                }
                Err(_) => break,
            }
        }
        tracing::trace!(target: targets::DISPATCH, processed, "drained ui queue");
        processed
    }

    /// Process invocations as they arrive until `condition` holds or `timeout` elapses.
    ///
    /// The condition is checked before waiting and after every invocation.
    /// Returns `true` if the condition was met.
    pub fn process_until<F>(&self, mut condition: F, timeout: Duration) -> bool
    where
        F: FnMut() -> bool,
    {
        self.affinity.debug_assert_same_thread();
        let deadline = Instant::now() + timeout;

        loop {
            if condition() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            // Wake periodically so conditions on external state are re-checked.
            match self.receiver.recv_timeout(remaining.min(POLL_SLICE)) {
                Ok(invocation) => invocation.execute(),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return condition(),
            }
        }
    }
}

/// A cloneable, `Send` handle for posting work to a [`UiQueue`].
#[derive(Debug, Clone)]
pub struct UiHandle {
    sender: Sender<QueuedInvocation>,
}

impl UiHandle {
    /// Queue a closure to run on the UI thread.
    ///
    /// Fails only if the owning queue has been dropped.
    pub fn post<F>(&self, invoke: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(QueuedInvocation::new(invoke))
            .map_err(|_| DispatchError::Disconnected)
    }
}

static_assertions::assert_impl_all!(UiHandle: Send, Sync, Clone);
