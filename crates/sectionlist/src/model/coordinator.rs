//! Filter coordinator state machine.
//!
//! `FilterCoordinator` owns the filter text, the committed filtered buffer, and
//! the identity of the single "current" background scan. It performs no I/O
//! and spawns nothing itself: callers start a scan for each [`FilterTicket`] it
//! hands out and feed the outcome back through [`FilterCoordinator::complete`].
//!
//! Every request that changes what the visible dataset should be (a new
//! filter, filter removal, a dataset swap) bumps a generation counter and
//! cancels the in-flight token. A completion is accepted only if its ticket
//! still carries the current generation and filter text and its scan was not
//! cancelled, so a superseded scan can never overwrite a newer result no
//! matter the order in which scans finish.

use std::sync::Arc;

use sectionlist_core::CancellationToken;

use super::filter::FilterOutcome;

/// Observable state of the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPhase {
    /// No filter; the raw source is visible.
    Idle,
    /// A scan for this text is in flight.
    Filtering(String),
    /// A buffer for this text is committed and no scan is in flight.
    Filtered(String),
}

impl FilterPhase {
    /// The filter text, or `None` when idle.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Filtering(text) | Self::Filtered(text) => Some(text),
        }
    }
}

/// The scope of one background scan.
#[derive(Debug, Clone)]
pub struct FilterTicket {
    generation: u64,
    text: String,
    token: CancellationToken,
}

impl FilterTicket {
    /// Generation this scan was launched in.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The filter text this scan was launched with.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cancellation token the scan must poll.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Why a completed scan was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The scan or its token was cancelled.
    Cancelled,
    /// A newer request bumped the generation.
    Superseded,
    /// The current filter text differs from the scan's text.
    TextMismatch,
}

/// Result of feeding a scan outcome back to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The result replaced the filtered buffer.
    Accepted {
        /// Number of matching items now visible.
        matches: usize,
    },
    /// The result was stale and dropped.
    Discarded(DiscardReason),
}

/// Filter text plus its committed buffer, held as one value so the two are
/// always set and cleared together.
#[derive(Debug)]
struct FilterView<T> {
    text: String,
    items: Arc<[T]>,
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    token: CancellationToken,
}

/// Coordinates at most one current filter scan and its committed result.
#[derive(Debug)]
pub struct FilterCoordinator<T> {
    generation: u64,
    in_flight: Option<InFlight>,
    view: Option<FilterView<T>>,
}

impl<T> Default for FilterCoordinator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FilterCoordinator<T> {
    /// Create an idle coordinator.
    pub fn new() -> Self {
        Self {
            generation: 0,
            in_flight: None,
            view: None,
        }
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current phase.
    pub fn phase(&self) -> FilterPhase {
        match (&self.view, &self.in_flight) {
            (None, _) => FilterPhase::Idle,
            (Some(view), Some(_)) => FilterPhase::Filtering(view.text.clone()),
            (Some(view), None) => FilterPhase::Filtered(view.text.clone()),
        }
    }

    /// Current filter text; empty when idle.
    pub fn filter_text(&self) -> &str {
        self.view.as_ref().map_or("", |view| view.text.as_str())
    }

    /// Returns `true` while a filter is set, whether or not its scan finished.
    pub fn is_active(&self) -> bool {
        self.view.is_some()
    }

    /// Returns `true` while a current scan is in flight.
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The committed filtered buffer, or `None` when no filter is set.
    ///
    /// While a scan is in flight this is the most recently committed buffer,
    /// which is empty for a brand new filter or after a dataset swap.
    pub fn filtered_items(&self) -> Option<Arc<[T]>> {
        self.view.as_ref().map(|view| view.items.clone())
    }

    /// Start filtering for `text`, superseding any in-flight scan.
    ///
    /// Empty text clears the filter instead and returns `None`. The previously
    /// committed buffer stays visible until the new scan is accepted.
    pub fn begin(&mut self, text: impl Into<String>) -> Option<FilterTicket> {
        let text = text.into();
        if text.is_empty() {
            self.clear();
            return None;
        }

        self.supersede();
        match self.view.as_mut() {
            Some(view) => view.text = text.clone(),
            None => {
                self.view = Some(FilterView {
                    text: text.clone(),
                    items: Arc::from(Vec::new()),
                })
            }
        }
        Some(self.launch(text))
    }

    /// Handle a dataset swap.
    ///
    /// With a filter set, the committed buffer is emptied and a re-filter
    /// ticket for the same text is returned. Without one, any stray scan is
    /// superseded and `None` is returned.
    pub fn reset_for_swap(&mut self) -> Option<FilterTicket> {
        self.supersede();
        let view = self.view.as_mut()?;
        view.items = Arc::from(Vec::new());
        let text = view.text.clone();
        Some(self.launch(text))
    }

    /// Remove the filter, cancelling any in-flight scan.
    ///
    /// Returns `true` if a filter was set.
    pub fn clear(&mut self) -> bool {
        self.supersede();
        self.view.take().is_some()
    }

    /// Cancel the in-flight scan without bumping the generation.
    pub fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.token.cancel();
        }
    }

    /// Apply or discard the outcome of the scan described by `ticket`.
    pub fn complete(&mut self, ticket: &FilterTicket, outcome: FilterOutcome<T>) -> Completion {
        if self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == ticket.generation)
        {
            self.in_flight = None;
        }

        let reason = if ticket.token.is_cancelled() {
            Some(DiscardReason::Cancelled)
        } else if ticket.generation != self.generation {
            Some(DiscardReason::Superseded)
        } else if self.filter_text() != ticket.text {
            Some(DiscardReason::TextMismatch)
        } else {
            None
        };
        if let Some(reason) = reason {
            return Completion::Discarded(reason);
        }

        let Some(matches) = outcome.into_matches() else {
            return Completion::Discarded(DiscardReason::Cancelled);
        };
        let Some(view) = self.view.as_mut() else {
            return Completion::Discarded(DiscardReason::TextMismatch);
        };

        let count = matches.len();
        view.items = Arc::from(matches);
        Completion::Accepted { matches: count }
    }

    fn supersede(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
    }

    fn launch(&mut self, text: String) -> FilterTicket {
        let token = CancellationToken::new();
        self.in_flight = Some(InFlight {
            generation: self.generation,
            token: token.clone(),
        });
        FilterTicket {
            generation: self.generation,
            text,
            token,
        }
    }
}
