//! Core systems for sectionlist.
//!
//! This crate provides the runtime plumbing the list adapter is built on:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **UI Dispatch**: A per-thread inbox that background work posts results to
//! - **Thread Pool**: Background execution with cooperative cancellation
//! - **Thread Checks**: Affinity assertions for UI-thread-only code
//!
//! # Background work with a UI completion
//!
//! ```
//! use sectionlist_core::{CancellationToken, ThreadPool, ThreadPoolConfig, UiQueue};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//!
//! let pool = ThreadPool::new(ThreadPoolConfig::with_threads(1)).unwrap();
//! let queue = UiQueue::new();
//! let token = CancellationToken::new();
//! let result = Arc::new(AtomicUsize::new(0));
//!
//! let task_token = token.clone();
//! let sink = result.clone();
//! pool.spawn_with_callback(
//!     &queue.handle(),
//!     move || (0..10).take_while(|_| !task_token.is_cancelled()).count(),
//!     move |count| sink.store(count, Ordering::SeqCst),
//! );
//!
//! queue.process_until(|| result.load(Ordering::SeqCst) != 0, Duration::from_secs(5));
//! assert_eq!(result.load(Ordering::SeqCst), 10);
//! ```

pub mod dispatch;
mod error;
pub mod logging;
pub mod signal;
pub mod thread_check;
pub mod threadpool;

pub use dispatch::{QueuedInvocation, UiHandle, UiQueue};
pub use error::{CoreError, DispatchError, Result, ThreadPoolError};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
pub use threadpool::{CancellationToken, ThreadPool, ThreadPoolConfig};
