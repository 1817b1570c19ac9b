//! Per-cell background content loading.
//!
//! A grid cell shows content (typically artwork) that is loaded off the UI
//! thread. [`CellLoadSlot`] keeps at most one load alive per cell: re-keying the
//! cell cancels and replaces the load, detaching it cancels the load, and a
//! completed load is not repeated for the same key.

use std::sync::Arc;

use parking_lot::Mutex;

use sectionlist_core::logging::targets;
use sectionlist_core::{CancellationToken, ThreadPool, UiHandle};

#[derive(Debug)]
struct SlotState<K> {
    source: Option<K>,
    done: bool,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl<K> SlotState<K> {
    fn invalidate(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
    }
}

/// Load slot of a single view cell, keyed by its content source.
#[derive(Debug)]
pub struct CellLoadSlot<K> {
    state: Arc<Mutex<SlotState<K>>>,
    ui: UiHandle,
}

impl<K> CellLoadSlot<K>
where
    K: Clone + PartialEq + Send + 'static,
{
    /// Create an empty slot whose completions are delivered through `ui`.
    pub fn new(ui: UiHandle) -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState {
                source: None,
                done: false,
                generation: 0,
                in_flight: None,
            })),
            ui,
        }
    }

    /// Point the cell at `key`.
    ///
    /// If the key changed, or the content for the current key is not done,
    /// the in-flight load is cancelled and the slot reset. Returns `true` if
    /// the slot was reset.
    pub fn set_source(&self, key: K) -> bool {
        let mut state = self.state.lock();
        if state.source.as_ref() == Some(&key) && state.done {
            return false;
        }
        state.invalidate();
        state.done = false;
        state.source = Some(key);
        true
    }

    /// Start loading content for the current key.
    ///
    /// Does nothing unless a key is set, no load is in flight, and the content
    /// is not done. `loader` runs on `pool`; `apply` runs on the UI thread with
    /// the loaded value, only if the slot was not re-keyed, reset, or detached
    /// meanwhile. A `None` from `loader` leaves the slot ready for a retry.
    ///
    /// The load counts as in flight until its completion runs on the UI
    /// thread. If the [`UiQueue`](sectionlist_core::UiQueue) behind the slot's
    /// handle is dropped first, the completion never runs and the slot keeps
    /// refusing new loads until [`detach`](Self::detach), [`reset`](Self::reset)
    /// or a re-key through [`set_source`](Self::set_source) clears it.
    ///
    /// Returns `true` if a load was started.
    pub fn start<V, L, A>(&self, pool: &ThreadPool, loader: L, apply: A) -> bool
    where
        V: Send + 'static,
        L: FnOnce(K, CancellationToken) -> Option<V> + Send + 'static,
        A: FnOnce(V) + Send + 'static,
    {
        let (key, token, generation) = {
            let mut state = self.state.lock();
            if state.in_flight.is_some() || state.done {
                return false;
            }
            let Some(key) = state.source.clone() else {
                return false;
            };
            let token = CancellationToken::new();
            state.in_flight = Some(token.clone());
            (key, token, state.generation)
        };

        let task_token = token.clone();
        let slot = Arc::downgrade(&self.state);
        pool.spawn_with_callback(
            &self.ui,
            move || {
                if task_token.is_cancelled() {
                    return None;
                }
                loader(key, task_token)
            },
            move |loaded| {
                let Some(slot) = slot.upgrade() else {
                    return;
                };
                let mut state = slot.lock();
                if state.generation != generation || token.is_cancelled() {
                    tracing::trace!(target: targets::CELL, generation, "stale cell load dropped");
                    return;
                }
                state.in_flight = None;
                let Some(value) = loaded else {
                    tracing::trace!(target: targets::CELL, "cell load produced nothing");
                    return;
                };
                state.done = true;
                drop(state);
                apply(value);
            },
        );
        true
    }

    /// Cancel any in-flight load. The key and done flag are kept.
    pub fn detach(&self) {
        self.state.lock().invalidate();
    }

    /// Cancel any in-flight load and forget the key.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.invalidate();
        state.source = None;
        state.done = false;
    }

    /// Returns `true` if content for the current key has been applied.
    pub fn is_done(&self) -> bool {
        self.state.lock().done
    }

    /// Returns `true` while a load is in flight.
    ///
    /// Stays `true` for a load whose completion could not be delivered; see
    /// [`start`](Self::start).
    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }

    /// The current key.
    pub fn source(&self) -> Option<K> {
        self.state.lock().source.clone()
    }
}

impl<K> Drop for CellLoadSlot<K> {
    fn drop(&mut self) {
        self.state.lock().invalidate();
    }
}
