//! Logging facilities for sectionlist.
//!
//! sectionlist uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("sectionlist::filter=debug")
//!     .init();
//! ```

/// Span names used throughout sectionlist for tracing.
pub mod span_names {
    /// Section index rebuild span.
    pub const SECTION_REBUILD: &str = "sectionlist::section_rebuild";
    /// Background filter scan span.
    pub const FILTER_SCAN: &str = "sectionlist::filter_scan";
    /// UI queue drain span.
    pub const DISPATCH: &str = "sectionlist::dispatch";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core runtime target.
    pub const CORE: &str = "sectionlist_core";
    /// Filter coordinator target.
    pub const FILTER: &str = "sectionlist::filter";
    /// Section index target.
    pub const SECTIONS: &str = "sectionlist::sections";
    /// Adapter facade target.
    pub const ADAPTER: &str = "sectionlist::adapter";
    /// Grid cell loader target.
    pub const CELL: &str = "sectionlist::cell";
    /// UI dispatch target.
    pub const DISPATCH: &str = "sectionlist::dispatch";
    /// Thread pool target.
    pub const POOL: &str = "sectionlist::pool";
    /// Signal system target.
    pub const SIGNAL: &str = "sectionlist::signal";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for tracking the duration of an operation.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "sectionlist::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Just ensure it compiles and doesn't panic without a subscriber
        let _span = PerfSpan::new(span_names::SECTION_REBUILD);
        tracing::trace!(target: targets::CORE, "inside span");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::FILTER,
            targets::SECTIONS,
            targets::ADAPTER,
            targets::CELL,
            targets::DISPATCH,
            targets::POOL,
            targets::SIGNAL,
        ] {
            assert!(target.starts_with("sectionlist::"));
        }
    }
}
