//! Change notifications.
//!
//! A [`Signal<Args>`] fans one event out to every connected slot. Slots run
//! synchronously on the emitting thread. Emitters call [`Signal::emit`] after
//! releasing their own locks, so a slot may query the emitter or even connect
//! more slots while it runs.
//!
//! # Example
//!
//! ```
//! use sectionlist_core::Signal;
//!
//! let rows_changed = Signal::<usize>::new();
//! let id = rows_changed.connect(|rows| println!("view now has {rows} rows"));
//!
//! rows_changed.emit(12);
//! assert!(rows_changed.disconnect(id));
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle of one connection, used to [`disconnect`](Signal::disconnect) it.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A typed notification with any number of connected slots.
///
/// Use `()` as `Args` for a bare notification.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// A signal with no slots.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect `slot`; it runs on every later [`emit`](Self::emit).
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Remove one connection. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Remove every connection.
    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Invoke every slot connected at the time of the call.
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");
        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Signal<usize>, Arc<Mutex<Vec<usize>>>) {
        let signal = Signal::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        signal.connect(move |&n| sink.lock().push(n));
        (signal, seen)
    }

    #[test]
    fn test_emit_reaches_slot() {
        let (signal, seen) = recorder();
        signal.emit(3);
        signal.emit(0);
        assert_eq!(*seen.lock(), vec![3, 0]);
    }

    #[test]
    fn test_every_slot_runs() {
        let (signal, seen) = recorder();
        let sink = seen.clone();
        signal.connect(move |&n| sink.lock().push(n * 10));

        signal.emit(2);
        let mut got = seen.lock().clone();
        got.sort_unstable();
        assert_eq!(got, vec![2, 20]);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<usize>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = signal.connect(move |&n| sink.lock().push(n));

        signal.emit(1);
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(2);
        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn test_disconnect_all() {
        let (signal, _seen) = recorder();
        signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 2);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_connecting_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let hits = Arc::new(Mutex::new(0));

        let emitter = signal.clone();
        let sink = hits.clone();
        signal.connect(move |_| {
            *sink.lock() += 1;
            emitter.connect(|_| {});
        });

        signal.emit(());
        assert_eq!(*hits.lock(), 1);
        assert_eq!(signal.connection_count(), 2);
    }
}
