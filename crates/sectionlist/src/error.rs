//! Error types for the list adapter.

use sectionlist_core::CoreError;

/// Result type alias for adapter operations.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Errors that can occur in the list adapter.
///
/// Stale or cancelled filter results are not errors; they are discarded
/// silently (and traced under `sectionlist::filter`).
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// A position query beyond the effective dataset.
    #[error("position {position} out of range for {len} items")]
    OutOfRange { position: usize, len: usize },

    /// A section query beyond the section index.
    #[error("section {section} out of range for {len} sections")]
    SectionOutOfRange { section: usize, len: usize },

    /// Invalid or unparsable configuration.
    #[error("invalid adapter configuration: {0}")]
    Config(String),

    /// Runtime error from the core crate (thread pool creation, dispatch).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AdapterError {
    /// Create an out-of-range error.
    pub fn out_of_range(position: usize, len: usize) -> Self {
        Self::OutOfRange { position, len }
    }

    /// Create a section out-of-range error.
    pub fn section_out_of_range(section: usize, len: usize) -> Self {
        Self::SectionOutOfRange { section, len }
    }
}

impl From<toml::de::Error> for AdapterError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AdapterError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(err.to_string())
    }
}
