//! Fast-scroll section index.
//!
//! A [`SectionIndex`] is the run-length boundary list of the section labels of
//! an ordered item sequence. Items are never sorted: sections appear in item
//! order, and a label whose items are not contiguous starts a new run each
//! time it reappears.
//!
//! Label lookup ([`SectionIndex::section_for_label`]) always resolves to the
//! *first* run of a label, even when later runs of the same label exist. A
//! fast-scroll jump to a label therefore lands on its earliest occurrence.
//!
//! # Example
//!
//! ```
//! use sectionlist::SectionIndex;
//!
//! let items = vec!["Apple", "apricot", "Banana", "bee", "Cherry"];
//! let index = SectionIndex::build(&items);
//!
//! assert_eq!(index.labels(), vec!["A", "B", "C"]);
//! assert_eq!(index.start_positions(), vec![0, 2, 4]);
//! ```

use std::collections::HashMap;
use std::fmt;

use sectionlist_core::PerfSpan;
use sectionlist_core::logging::{span_names, targets};

use super::item::SectionItem;

/// The normalized label of a section: the upper-cased first character of a
/// section key, or a blank label for an empty key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionLabel(char);

impl SectionLabel {
    /// The label used for items with an empty section key.
    pub const BLANK: SectionLabel = SectionLabel(' ');

    /// Derive the label of a section key.
    pub fn from_key(key: &str) -> Self {
        key.chars()
            .next()
            .map(|first| Self(first.to_uppercase().next().unwrap_or(first)))
            .unwrap_or(Self::BLANK)
    }

    /// The label character.
    pub fn as_char(self) -> char {
        self.0
    }

    /// Returns `true` for the blank label.
    pub fn is_blank(self) -> bool {
        self == Self::BLANK
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One run of consecutive items sharing a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Label shared by every item in the run.
    pub label: SectionLabel,
    /// Position of the first item in the run.
    pub start: usize,
}

/// Ordered section runs plus a label lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionIndex {
    sections: Vec<Section>,
    /// Label to the index of its first run.
    first_run: HashMap<SectionLabel, usize>,
}

impl SectionIndex {
    /// An index with no sections.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index for an ordered item sequence.
    ///
    /// O(n) and free of I/O; cheap enough to run on the UI thread.
    pub fn build<T: SectionItem>(items: &[T]) -> Self {
        let _span = PerfSpan::new(span_names::SECTION_REBUILD);
        let mut index = Self::empty();
        let mut previous: Option<SectionLabel> = None;

        for (position, item) in items.iter().enumerate() {
            let label = SectionLabel::from_key(item.section_key());
            if previous != Some(label) {
                index.first_run.entry(label).or_insert(index.sections.len());
                index.sections.push(Section {
                    label,
                    start: position,
                });
                previous = Some(label);
            }
        }

        tracing::trace!(
            target: targets::SECTIONS,
            items = items.len(),
            sections = index.sections.len(),
            "section index built"
        );
        index
    }

    /// Number of section runs.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The section runs, in item order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The label of every run, as strings, in item order.
    pub fn labels(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.label.to_string()).collect()
    }

    /// The start position of every run.
    pub fn start_positions(&self) -> Vec<usize> {
        self.sections.iter().map(|s| s.start).collect()
    }

    /// Start position of a section, or `None` if out of range.
    pub fn position_for_section(&self, section: usize) -> Option<usize> {
        self.sections.get(section).map(|s| s.start)
    }

    /// Index of the first run carrying `label`.
    pub fn section_for_label(&self, label: SectionLabel) -> Option<usize> {
        self.first_run.get(&label).copied()
    }

    /// Index of the first run carrying the label of `key`.
    pub fn section_for_key(&self, key: &str) -> Option<usize> {
        self.section_for_label(SectionLabel::from_key(key))
    }

    /// Length of every run, given the total item count the index was built from.
    pub fn run_lengths(&self, total: usize) -> Vec<usize> {
        self.sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let end = self
                    .sections
                    .get(i + 1)
                    .map_or(total, |next| next.start);
                end - section.start
            })
            .collect()
    }
}
