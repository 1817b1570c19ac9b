//! Substring filtering with cooperative cancellation.

use sectionlist_core::CancellationToken;

use super::item::SectionItem;

/// The result of a filter scan.
///
/// A cancelled scan carries no items, so a truncated scan can never be
/// mistaken for a genuine (if small) match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome<T> {
    /// The scan ran to completion; matches are in source order.
    Completed(Vec<T>),
    /// The token was cancelled before the scan finished.
    Cancelled,
}

impl<T> FilterOutcome<T> {
    /// Returns `true` if the scan was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The matches of a completed scan.
    pub fn into_matches(self) -> Option<Vec<T>> {
        match self {
            Self::Completed(items) => Some(items),
            Self::Cancelled => None,
        }
    }
}

/// `folded` must already be lowercase.
fn contains_folded(key: &str, folded: &str) -> bool {
    key.to_lowercase().contains(folded)
}

/// Collect the items whose section key contains `text`, ignoring case.
///
/// The token is polled before every `check_interval`-th item and once more at
/// the end. An interval of zero is treated as one.
pub fn filter_items<T>(
    items: &[T],
    text: &str,
    token: &CancellationToken,
    check_interval: usize,
) -> FilterOutcome<T>
where
    T: SectionItem + Clone,
{
    let interval = check_interval.max(1);
    let needle = text.to_lowercase();
    let mut matches = Vec::new();

    for (i, item) in items.iter().enumerate() {
        if i % interval == 0 && token.is_cancelled() {
            return FilterOutcome::Cancelled;
        }
        if contains_folded(item.section_key(), &needle) {
            matches.push(item.clone());
        }
    }

    if token.is_cancelled() {
        return FilterOutcome::Cancelled;
    }
    FilterOutcome::Completed(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruits() -> Vec<String> {
        ["Apple", "apricot", "Banana", "bee", "Cherry"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let token = CancellationToken::new();
        let outcome = filter_items(&fruits(), "an", &token, 1);
        assert_eq!(outcome, FilterOutcome::Completed(vec!["Banana".to_string()]));

        let outcome = filter_items(&fruits(), "AP", &token, 1);
        assert_eq!(
            outcome.into_matches(),
            Some(vec!["Apple".to_string(), "apricot".to_string()])
        );
    }

    #[test]
    fn test_no_matches_is_completed_and_empty() {
        let token = CancellationToken::new();
        let outcome = filter_items(&fruits(), "zzz", &token, 1);
        assert_eq!(outcome, FilterOutcome::Completed(Vec::new()));
        assert!(!outcome.is_cancelled());
    }

    #[test]
    fn test_empty_text_matches_everything() {
        let token = CancellationToken::new();
        let outcome = filter_items(&fruits(), "", &token, 3);
        assert_eq!(outcome.into_matches().map(|m| m.len()), Some(5));
    }

    #[test]
    fn test_cancelled_before_scan() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(filter_items(&fruits(), "a", &token, 1).is_cancelled());
        assert!(filter_items(&fruits(), "a", &token, 0).is_cancelled());
    }

    /// Reading the key `"ab"` cancels the scan it belongs to.
    #[derive(Clone)]
    struct Tripwire {
        key: &'static str,
        token: CancellationToken,
    }

    impl SectionItem for Tripwire {
        fn section_key(&self) -> &str {
            if self.key == "ab" {
                self.token.cancel();
            }
            self.key
        }
    }

    fn tripwires(token: &CancellationToken) -> Vec<Tripwire> {
        ["a", "ab", "abc"]
            .into_iter()
            .map(|key| Tripwire {
                key,
                token: token.clone(),
            })
            .collect()
    }

    #[test]
    fn test_cancelled_during_scan_discards_partial_matches() {
        let token = CancellationToken::new();
        assert!(filter_items(&tripwires(&token), "a", &token, 1).is_cancelled());
    }

    #[test]
    fn test_cancelled_after_last_poll_is_still_cancelled() {
        // With an interval of 4 the loop only polls before the first item.
        let token = CancellationToken::new();
        let outcome = filter_items(&tripwires(&token), "a", &token, 4);
        assert!(token.is_cancelled());
        assert!(outcome.is_cancelled());
        assert!(outcome.into_matches().is_none());
    }

    #[test]
    fn test_contains_folded() {
        assert!(contains_folded("Banana", "nan"));
        assert!(contains_folded("BANANA", "nan"));
        assert!(!contains_folded("apricot", "an"));
    }

    #[test]
    fn test_same_text_twice_is_identical() {
        let token = CancellationToken::new();
        let first = filter_items(&fruits(), "e", &token, 1);
        let second = filter_items(&fruits(), "e", &token, 1);
        assert_eq!(first, second);
    }
}
