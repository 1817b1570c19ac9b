//! Supersession tests with scans forced to finish out of order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use sectionlist::prelude::*;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Blocks the first scan that reads a key after being armed.
struct Gate {
    armed: AtomicBool,
    entered: Barrier,
    release: Barrier,
}

impl Gate {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            armed: AtomicBool::new(false),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        })
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn pass(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
    }
}

#[derive(Clone)]
struct Track {
    title: &'static str,
    gate: Arc<Gate>,
}

impl SectionItem for Track {
    fn section_key(&self) -> &str {
        self.gate.pass();
        self.title
    }
}

fn tracks(gate: &Arc<Gate>) -> Vec<Track> {
    ["a", "abba", "abc", "b", "ca"]
        .into_iter()
        .map(|title| Track {
            title,
            gate: gate.clone(),
        })
        .collect()
}

fn titles(adapter: &SectionListAdapter<Track>) -> Vec<&'static str> {
    adapter.effective_items().iter().map(|t| t.title).collect()
}

fn setup() -> (UiQueue, Arc<ThreadPool>, SectionListAdapter<Track>, Arc<Gate>) {
    let queue = UiQueue::new();
    let pool = Arc::new(ThreadPool::new(ThreadPoolConfig::with_threads(2)).unwrap());
    let adapter =
        SectionListAdapter::with_pool(queue.handle(), AdapterConfig::default(), pool.clone());
    let gate = Gate::new();
    adapter.swap_dataset(tracks(&gate));
    (queue, pool, adapter, gate)
}

fn settle(queue: &UiQueue, pool: &ThreadPool) {
    assert!(queue.process_until(|| pool.active_tasks() == 0, TIMEOUT));
    queue.process_pending();
}

#[test]
fn test_older_scan_finishing_last_is_discarded() {
    let (queue, pool, adapter, gate) = setup();

    gate.arm();
    adapter.apply_filter("a");
    // The "a" scan is now parked on its first item.
    gate.entered.wait();

    adapter.apply_filter("ab");
    assert!(queue.process_until(
        || adapter.filter_phase() == FilterPhase::Filtered("ab".into()),
        TIMEOUT
    ));
    assert_eq!(titles(&adapter), vec!["abba", "abc"]);

    gate.release.wait();
    settle(&queue, &pool);

    assert_eq!(titles(&adapter), vec!["abba", "abc"]);
    assert_eq!(adapter.section_labels(), vec!["A"]);
    assert_eq!(adapter.filter_phase(), FilterPhase::Filtered("ab".into()));
}

#[test]
fn test_scan_in_flight_during_swap_is_discarded() {
    let (queue, pool, adapter, gate) = setup();

    gate.arm();
    adapter.apply_filter("b");
    gate.entered.wait();

    let fresh = Gate::new();
    adapter.swap_dataset(vec![Track {
        title: "bob",
        gate: fresh,
    }]);
    gate.release.wait();
    settle(&queue, &pool);

    assert_eq!(titles(&adapter), vec!["bob"]);
    assert_eq!(adapter.filter_text(), "b");
}

#[test]
fn test_scan_in_flight_during_remove_is_discarded() {
    let (queue, pool, adapter, gate) = setup();

    gate.arm();
    adapter.apply_filter("c");
    gate.entered.wait();

    adapter.remove_filter();
    gate.release.wait();
    settle(&queue, &pool);

    assert_eq!(adapter.filter_phase(), FilterPhase::Idle);
    assert_eq!(adapter.count(), 5);
    assert_eq!(adapter.section_labels(), vec!["A", "B", "C"]);
}

#[test]
fn test_queries_stay_consistent_while_scanning() {
    let (queue, pool, adapter, gate) = setup();
    adapter.apply_filter("a");
    settle(&queue, &pool);

    gate.arm();
    adapter.apply_filter("ab");
    gate.entered.wait();

    // The previous result stays visible until the refined one is accepted.
    assert!(adapter.is_filter_pending());
    assert_eq!(adapter.filter_text(), "ab");
    assert_eq!(adapter.count(), 4);

    gate.release.wait();
    settle(&queue, &pool);
    assert_eq!(adapter.count(), 2);
}
