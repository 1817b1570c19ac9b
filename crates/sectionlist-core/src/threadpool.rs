//! Background workers for filter scans and cell loads.
//!
//! [`ThreadPool`] wraps a rayon pool. Work submitted with
//! [`ThreadPool::spawn_with_callback`] runs on a worker; its completion
//! closure is posted to a [`UiQueue`](crate::dispatch::UiQueue) and runs when
//! the interactive thread next drains it. Cancellation is cooperative: a
//! [`CancellationToken`] only raises a flag that the work polls.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use sectionlist_core::dispatch::UiQueue;
//! use sectionlist_core::threadpool::{CancellationToken, ThreadPool, ThreadPoolConfig};
//!
//! let pool = ThreadPool::new(ThreadPoolConfig::with_threads(1)).unwrap();
//! let queue = UiQueue::new();
//! let token = CancellationToken::new();
//!
//! let scan_token = token.clone();
//! pool.spawn_with_callback(
//!     &queue.handle(),
//!     move || (!scan_token.is_cancelled()).then_some("scanned"),
//!     |result| println!("delivered on the UI thread: {result:?}"),
//! );
//!
//! queue.process_until(|| pool.active_tasks() == 0, Duration::from_secs(5));
//! queue.process_pending();
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use rayon::{ThreadPool as RayonThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::dispatch::UiHandle;
use crate::error::{CoreError, ThreadPoolError};
use crate::logging::targets;

static GLOBAL_POOL: OnceLock<ThreadPool> = OnceLock::new();

/// Shared flag asking a background task to stop.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once any clone of this token was cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Cancel every clone of this token. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadPoolConfig {
    /// Worker count; `None` uses one per CPU core.
    pub num_threads: Option<usize>,
    /// Worker names are `{thread_name}-{index}`.
    pub thread_name: String,
    /// Worker stack size in bytes; `None` keeps rayon's default.
    pub stack_size: Option<usize>,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name: "sectionlist-worker".to_string(),
            stack_size: None,
        }
    }
}

impl ThreadPoolConfig {
    /// Default settings with a fixed worker count.
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
            ..Self::default()
        }
    }

    /// Set the worker name prefix.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// A pool of background workers.
pub struct ThreadPool {
    pool: RayonThreadPool,
    active_tasks: Arc<AtomicUsize>,
}

impl ThreadPool {
    /// The process-wide pool, created with default settings on first use.
    pub fn global() -> &'static ThreadPool {
        GLOBAL_POOL.get_or_init(|| {
            ThreadPool::new(ThreadPoolConfig::default())
                .expect("Failed to create global thread pool")
        })
    }

    /// Build a pool from `config`.
    pub fn new(config: ThreadPoolConfig) -> Result<Self, CoreError> {
        let prefix = config.thread_name.clone();
        let mut builder =
            ThreadPoolBuilder::new().thread_name(move |index| format!("{prefix}-{index}"));
        if let Some(threads) = config.num_threads {
            builder = builder.num_threads(threads);
        }
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let pool = builder
            .build()
            .map_err(|e| ThreadPoolError::CreationFailed(e.to_string()))?;

        tracing::debug!(
            target: targets::POOL,
            threads = pool.current_num_threads(),
            name = %config.thread_name,
            "thread pool created"
        );

        Ok(Self {
            pool,
            active_tasks: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Tasks queued or running whose completion has not yet been posted.
    pub fn active_tasks(&self) -> usize {
        self.active_tasks.load(Ordering::Acquire)
    }

    /// Run `task` on a worker and post `callback(result)` to the UI queue.
    ///
    /// The task counts as active until its callback has been posted. If the
    /// queue is gone the result is dropped.
    pub fn spawn_with_callback<F, T, C>(&self, ui: &UiHandle, task: F, callback: C)
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        self.active_tasks.fetch_add(1, Ordering::AcqRel);
        let active = self.active_tasks.clone();
        let ui = ui.clone();

        self.pool.spawn(move || {
            let result = task();
            if ui.post(move || callback(result)).is_err() {
                tracing::trace!(target: targets::POOL, "ui queue gone, dropping task result");
            }
            active.fetch_sub(1, Ordering::AcqRel);
        });
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("num_threads", &self.num_threads())
            .field("active_tasks", &self.active_tasks())
            .finish()
    }
}

static_assertions::assert_impl_all!(ThreadPool: Send, Sync);
static_assertions::assert_impl_all!(CancellationToken: Send, Sync, Clone);
