//! The sectioned list adapter.
//!
//! [`SectionListAdapter`] is the contract a list or grid view consumes: item
//! count and lookup, fast-scroll section queries, and the mutations that
//! change what is visible (dataset swap, filtering, section toggling).
//!
//! # Threading
//!
//! Mutations and completion handling happen on the interactive thread that
//! drains the adapter's [`UiQueue`](sectionlist_core::UiQueue). Filter scans
//! run on a [`ThreadPool`] and post their outcome back through the
//! [`UiHandle`] the adapter was built with. Queries take short internal locks
//! and may be called from any thread.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sectionlist::{AdapterConfig, SectionListAdapter};
//! use sectionlist_core::{ThreadPool, ThreadPoolConfig, UiQueue};
//!
//! let queue = UiQueue::new();
//! let pool = Arc::new(ThreadPool::new(ThreadPoolConfig::with_threads(1)).unwrap());
//! let adapter = SectionListAdapter::with_pool(queue.handle(), AdapterConfig::default(), pool.clone());
//!
//! adapter.swap_dataset(vec!["Apple", "apricot", "Banana", "bee", "Cherry"]);
//! assert_eq!(adapter.section_labels(), vec!["A", "B", "C"]);
//!
//! adapter.apply_filter("an");
//! queue.process_until(|| !adapter.is_filter_pending(), Duration::from_secs(5));
//! assert_eq!(adapter.effective_items().to_vec(), vec!["Banana"]);
//! assert_eq!(adapter.section_labels(), vec!["B"]);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use sectionlist_core::logging::{span_names, targets};
use sectionlist_core::{PerfSpan, Signal, ThreadAffinity, ThreadPool, UiHandle};

use super::coordinator::{Completion, FilterCoordinator, FilterPhase, FilterTicket};
use super::filter::{FilterOutcome, filter_items};
use super::item::SectionItem;
use super::section::SectionIndex;
use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};

/// Change notifications emitted by the adapter.
///
/// Every signal is emitted after the adapter has released its internal locks,
/// so connected slots may query the adapter.
#[derive(Debug, Default)]
pub struct AdapterSignals {
    /// The effective dataset or the section structures changed.
    pub data_set_changed: Signal<()>,
    /// A filter result was committed. Carries the filter text.
    pub filter_committed: Signal<String>,
    /// The section index was rebuilt or cleared. Carries the section count.
    pub sections_changed: Signal<usize>,
}

enum PoolRef {
    Global,
    Shared(Arc<ThreadPool>),
}

impl PoolRef {
    fn get(&self) -> &ThreadPool {
        match self {
            Self::Global => ThreadPool::global(),
            Self::Shared(pool) => pool,
        }
    }
}

struct Inner<T> {
    source: RwLock<Arc<[T]>>,
    filter: Mutex<FilterCoordinator<T>>,
    sections: RwLock<SectionIndex>,
    sections_enabled: AtomicBool,
    check_interval: usize,
    pool: PoolRef,
    ui: UiHandle,
    affinity: ThreadAffinity,
    signals: AdapterSignals,
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        self.filter.get_mut().cancel_in_flight();
    }
}

/// A list adapter with fast-scroll sections and background filtering.
///
/// Cloning yields another handle to the same adapter.
pub struct SectionListAdapter<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for SectionListAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> std::fmt::Debug for SectionListAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filter = self.inner.filter.lock();
        f.debug_struct("SectionListAdapter")
            .field("source_len", &self.inner.source.read().len())
            .field("phase", &filter.phase())
            .field("sections", &self.inner.sections.read().len())
            .field(
                "sections_enabled",
                &self.inner.sections_enabled.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl<T> SectionListAdapter<T>
where
    T: SectionItem + Clone + 'static,
{
    /// Create an empty adapter that runs scans on the global thread pool.
    pub fn new(ui: UiHandle) -> Self {
        Self::build(ui, AdapterConfig::default(), PoolRef::Global)
    }

    /// Create an empty adapter with its own thread pool built from `config.pool`.
    pub fn with_config(ui: UiHandle, config: AdapterConfig) -> AdapterResult<Self> {
        let pool = ThreadPool::new(config.pool.clone())?;
        Ok(Self::build(ui, config, PoolRef::Shared(Arc::new(pool))))
    }

    /// Create an empty adapter that runs scans on a shared pool.
    ///
    /// `config.pool` is ignored.
    pub fn with_pool(ui: UiHandle, config: AdapterConfig, pool: Arc<ThreadPool>) -> Self {
        Self::build(ui, config, PoolRef::Shared(pool))
    }

    fn build(ui: UiHandle, config: AdapterConfig, pool: PoolRef) -> Self {
        Self {
            inner: Arc::new(Inner {
                source: RwLock::new(Arc::from(Vec::new())),
                filter: Mutex::new(FilterCoordinator::new()),
                sections: RwLock::new(SectionIndex::empty()),
                sections_enabled: AtomicBool::new(config.sections_enabled),
                check_interval: config.effective_check_interval(),
                pool,
                ui,
                affinity: ThreadAffinity::current(),
                signals: AdapterSignals::default(),
            }),
        }
    }

    // =========================================================================
    // Dataset queries
    // =========================================================================

    /// Snapshot of the effective dataset: the filtered buffer while a filter is
    /// set, otherwise the raw source.
    pub fn effective_items(&self) -> Arc<[T]> {
        let filter = self.inner.filter.lock();
        filter
            .filtered_items()
            .unwrap_or_else(|| self.inner.source.read().clone())
    }

    /// Number of items in the effective dataset.
    pub fn count(&self) -> usize {
        self.effective_items().len()
    }

    /// Returns `true` if the effective dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of items in the raw source, ignoring any filter.
    pub fn source_len(&self) -> usize {
        self.inner.source.read().len()
    }

    /// The item at `position` in the effective dataset.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.count()`.
    pub fn item_at(&self, position: usize) -> T {
        self.effective_items()[position].clone()
    }

    /// The item at `position`, or `None` if out of range.
    pub fn get(&self, position: usize) -> Option<T> {
        self.effective_items().get(position).cloned()
    }

    /// The item at `position`, or an [`AdapterError::OutOfRange`].
    pub fn try_item_at(&self, position: usize) -> AdapterResult<T> {
        let items = self.effective_items();
        items
            .get(position)
            .cloned()
            .ok_or_else(|| AdapterError::out_of_range(position, items.len()))
    }

    /// Stable id of the item at `position`.
    ///
    /// Ids are positional: they hold only until the effective dataset changes.
    pub fn id_for(&self, position: usize) -> u64 {
        position as u64
    }

    // =========================================================================
    // Section queries
    // =========================================================================

    /// Returns `true` if the section index is maintained.
    pub fn sections_enabled(&self) -> bool {
        self.inner.sections_enabled.load(Ordering::Acquire)
    }

    /// Snapshot of the section index; empty while sections are disabled.
    pub fn section_index(&self) -> SectionIndex {
        self.inner.sections.read().clone()
    }

    /// The label of every section, in item order; empty while sections are disabled.
    pub fn section_labels(&self) -> Vec<String> {
        if !self.sections_enabled() {
            return Vec::new();
        }
        self.inner.sections.read().labels()
    }

    /// Start position of `section`. Returns 0 while sections are disabled.
    ///
    /// # Panics
    ///
    /// Panics if sections are enabled and `section` is out of range.
    pub fn position_for_section(&self, section: usize) -> usize {
        if !self.sections_enabled() {
            return 0;
        }
        self.inner.sections.read().sections()[section].start
    }

    /// Checked form of [`position_for_section`](Self::position_for_section).
    pub fn try_position_for_section(&self, section: usize) -> AdapterResult<usize> {
        if !self.sections_enabled() {
            return Ok(0);
        }
        let sections = self.inner.sections.read();
        sections
            .position_for_section(section)
            .ok_or_else(|| AdapterError::section_out_of_range(section, sections.len()))
    }

    /// The section containing the item at `position`.
    ///
    /// This is the first section carrying the item's label, which may precede
    /// the run the item belongs to when labels are not contiguous. Returns 0
    /// while sections are disabled or if the label is unknown.
    ///
    /// # Panics
    ///
    /// Panics if sections are enabled and `position >= self.count()`.
    pub fn section_for_position(&self, position: usize) -> usize {
        if !self.sections_enabled() {
            return 0;
        }
        let items = self.effective_items();
        self.lookup_section(items[position].section_key())
    }

    /// Checked form of [`section_for_position`](Self::section_for_position).
    pub fn try_section_for_position(&self, position: usize) -> AdapterResult<usize> {
        if !self.sections_enabled() {
            return Ok(0);
        }
        let items = self.effective_items();
        let item = items
            .get(position)
            .ok_or_else(|| AdapterError::out_of_range(position, items.len()))?;
        Ok(self.lookup_section(item.section_key()))
    }

    fn lookup_section(&self, key: &str) -> usize {
        self.inner.sections.read().section_for_key(key).unwrap_or(0)
    }

    // =========================================================================
    // Filter state
    // =========================================================================

    /// The current filter text; empty when no filter is set.
    pub fn filter_text(&self) -> String {
        self.inner.filter.lock().filter_text().to_string()
    }

    /// The current filter phase.
    pub fn filter_phase(&self) -> FilterPhase {
        self.inner.filter.lock().phase()
    }

    /// Returns `true` while the current filter scan is in flight.
    ///
    /// A scan counts as in flight until its completion runs on the UI thread.
    /// If the [`UiQueue`](sectionlist_core::UiQueue) behind the adapter's
    /// handle is dropped first, this stays `true` until the next
    /// [`apply_filter`](Self::apply_filter), [`remove_filter`](Self::remove_filter)
    /// or [`swap_dataset`](Self::swap_dataset) supersedes the scan.
    pub fn is_filter_pending(&self) -> bool {
        self.inner.filter.lock().is_pending()
    }

    /// The adapter's change notifications.
    pub fn signals(&self) -> &AdapterSignals {
        &self.inner.signals
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace the raw source.
    ///
    /// With a filter set, the filtered buffer is emptied and the filter is
    /// re-run against the new source. Without one, the sections are rebuilt
    /// over the new source.
    pub fn swap_dataset(&self, items: Vec<T>) {
        self.inner.affinity.debug_assert_same_thread();
        let len = items.len();

        let refilter = {
            let mut filter = self.inner.filter.lock();
            let source: Arc<[T]> = Arc::from(items);
            *self.inner.source.write() = source.clone();
            filter.reset_for_swap().map(|ticket| (ticket, source))
        };
        tracing::debug!(
            target: targets::ADAPTER,
            len,
            refilter = refilter.is_some(),
            "dataset swapped"
        );

        self.refresh();
        if let Some((ticket, source)) = refilter {
            self.launch(ticket, source);
        }
    }

    /// Replace the raw source with an empty one.
    pub fn clear_dataset(&self) {
        self.swap_dataset(Vec::new());
    }

    /// Filter the effective dataset down to items whose section key contains
    /// `text`, ignoring case.
    ///
    /// Any in-flight scan is cancelled and superseded. The previously
    /// committed buffer stays visible until the new result is accepted; a
    /// brand new filter starts out empty. Empty text removes the filter.
    pub fn apply_filter(&self, text: impl Into<String>) {
        self.inner.affinity.debug_assert_same_thread();
        let text = text.into();
        if text.is_empty() {
            self.remove_filter();
            return;
        }

        let (launched, was_active) = {
            let mut filter = self.inner.filter.lock();
            let was_active = filter.is_active();
            let ticket = filter.begin(text);
            let source = self.inner.source.read().clone();
            (ticket.map(|ticket| (ticket, source)), was_active)
        };

        if !was_active {
            self.refresh();
        }
        if let Some((ticket, source)) = launched {
            self.launch(ticket, source);
        }
    }

    /// Remove the filter, making the raw source visible again.
    pub fn remove_filter(&self) {
        self.inner.affinity.debug_assert_same_thread();
        let had_filter = self.inner.filter.lock().clear();
        tracing::debug!(target: targets::FILTER, had_filter, "filter removed");
        self.refresh();
    }

    /// Enable or disable the section index.
    ///
    /// Enabling rebuilds it over the effective dataset right away; disabling
    /// clears it. The filter state is left alone.
    pub fn enable_sections(&self, enabled: bool) {
        self.inner.affinity.debug_assert_same_thread();
        self.inner.sections_enabled.store(enabled, Ordering::Release);
        tracing::debug!(target: targets::SECTIONS, enabled, "sections toggled");
        self.refresh();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Rebuild or clear the section index, then notify.
    fn refresh(&self) {
        let count = self.rebuild_sections();
        let signals = &self.inner.signals;
        signals.sections_changed.emit(count);
        signals.data_set_changed.emit(());
    }

    fn rebuild_sections(&self) -> usize {
        if !self.sections_enabled() {
            *self.inner.sections.write() = SectionIndex::empty();
            return 0;
        }
        let index = SectionIndex::build(&self.effective_items());
        let count = index.len();
        *self.inner.sections.write() = index;
        count
    }

    fn launch(&self, ticket: FilterTicket, source: Arc<[T]>) {
        tracing::debug!(
            target: targets::FILTER,
            text = ticket.text(),
            generation = ticket.generation(),
            items = source.len(),
            "filter scan launched"
        );

        let interval = self.inner.check_interval;
        let scan = ticket.clone();
        let adapter: Weak<Inner<T>> = Arc::downgrade(&self.inner);

        self.inner.pool.get().spawn_with_callback(
            &self.inner.ui,
            move || {
                let _span = PerfSpan::new(span_names::FILTER_SCAN);
                filter_items(&source, scan.text(), scan.token(), interval)
            },
            move |outcome| {
                if let Some(inner) = adapter.upgrade() {
                    SectionListAdapter { inner }.finish(&ticket, outcome);
                }
            },
        );
    }

    fn finish(&self, ticket: &FilterTicket, outcome: FilterOutcome<T>) {
        self.inner.affinity.debug_assert_same_thread();
        let completion = self.inner.filter.lock().complete(ticket, outcome);

        match completion {
            Completion::Accepted { matches } => {
                tracing::debug!(
                    target: targets::FILTER,
                    text = ticket.text(),
                    matches,
                    "filter result committed"
                );
                let count = self.rebuild_sections();
                let signals = &self.inner.signals;
                signals.sections_changed.emit(count);
                signals.filter_committed.emit(ticket.text().to_string());
                signals.data_set_changed.emit(());
            }
            Completion::Discarded(reason) => {
                tracing::trace!(
                    target: targets::FILTER,
                    text = ticket.text(),
                    generation = ticket.generation(),
                    ?reason,
                    "filter result discarded"
                );
            }
        }
    }
}

static_assertions::assert_impl_all!(SectionListAdapter<String>: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use sectionlist_core::{ThreadPoolConfig, UiQueue};
    use std::time::Duration;

    fn fruits() -> Vec<&'static str> {
        vec!["Apple", "apricot", "Banana", "bee", "Cherry"]
    }

    fn setup() -> (UiQueue, Arc<ThreadPool>, SectionListAdapter<&'static str>) {
        let queue = UiQueue::new();
        let pool = Arc::new(ThreadPool::new(ThreadPoolConfig::with_threads(2)).unwrap());
        let adapter =
            SectionListAdapter::with_pool(queue.handle(), AdapterConfig::default(), pool.clone());
        (queue, pool, adapter)
    }

    fn settle(queue: &UiQueue, pool: &ThreadPool) {
        assert!(queue.process_until(|| pool.active_tasks() == 0, Duration::from_secs(5)));
        queue.process_pending();
    }

    #[test]
    fn test_empty_adapter() {
        let (_queue, _pool, adapter) = setup();
        assert_eq!(adapter.count(), 0);
        assert!(adapter.is_empty());
        assert!(adapter.section_labels().is_empty());
        assert_eq!(adapter.filter_phase(), FilterPhase::Idle);
    }

    #[test]
    fn test_swap_builds_sections() {
        let (_queue, _pool, adapter) = setup();
        adapter.swap_dataset(fruits());

        assert_eq!(adapter.count(), 5);
        assert_eq!(adapter.section_labels(), vec!["A", "B", "C"]);
        assert_eq!(adapter.position_for_section(2), 4);
        assert_eq!(adapter.section_for_position(3), 1);
        assert_eq!(adapter.item_at(2), "Banana");
        assert_eq!(adapter.id_for(2), 2);
    }

    #[test]
    fn test_checked_accessors() {
        let (_queue, _pool, adapter) = setup();
        adapter.swap_dataset(fruits());

        assert_eq!(adapter.get(5), None);
        assert!(matches!(
            adapter.try_item_at(9),
            Err(AdapterError::OutOfRange { position: 9, len: 5 })
        ));
        assert!(matches!(
            adapter.try_position_for_section(3),
            Err(AdapterError::SectionOutOfRange { section: 3, len: 3 })
        ));
        assert_eq!(adapter.try_section_for_position(4).unwrap(), 2);
    }

    #[test]
    #[should_panic]
    fn test_item_at_out_of_range_panics() {
        let (_queue, _pool, adapter) = setup();
        adapter.swap_dataset(fruits());
        adapter.item_at(5);
    }

    #[test]
    fn test_filter_commit() {
        let (queue, pool, adapter) = setup();
        adapter.swap_dataset(fruits());
        adapter.apply_filter("an");

        assert_eq!(adapter.filter_phase(), FilterPhase::Filtering("an".into()));
        assert_eq!(adapter.count(), 0);

        settle(&queue, &pool);
        assert_eq!(adapter.filter_phase(), FilterPhase::Filtered("an".into()));
        assert_eq!(adapter.effective_items().to_vec(), vec!["Banana"]);
        assert_eq!(adapter.section_labels(), vec!["B"]);
        assert_eq!(adapter.source_len(), 5);
    }

    #[test]
    fn test_empty_text_removes_filter() {
        let (queue, pool, adapter) = setup();
        adapter.swap_dataset(fruits());
        adapter.apply_filter("an");
        settle(&queue, &pool);

        adapter.apply_filter("");
        assert_eq!(adapter.filter_phase(), FilterPhase::Idle);
        assert_eq!(adapter.count(), 5);
    }

    #[test]
    fn test_disabled_sections_report_zero() {
        let (_queue, _pool, adapter) = setup();
        adapter.swap_dataset(fruits());
        adapter.enable_sections(false);

        assert!(adapter.section_labels().is_empty());
        assert!(adapter.section_index().is_empty());
        assert_eq!(adapter.position_for_section(7), 0);
        assert_eq!(adapter.section_for_position(99), 0);
        assert_eq!(adapter.try_section_for_position(99).unwrap(), 0);
    }

    #[test]
    fn test_completion_after_drop_is_ignored() {
        let (queue, pool, adapter) = setup();
        adapter.swap_dataset(fruits());
        adapter.apply_filter("a");
        drop(adapter);

        settle(&queue, &pool);
        assert!(!queue.has_pending());
    }
}
