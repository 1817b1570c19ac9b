//! Adapter configuration.
//!
//! `AdapterConfig` can be built in code or loaded from TOML:
//!
//! ```
//! use sectionlist::AdapterConfig;
//!
//! let config = AdapterConfig::from_toml_str(r#"
//! sections_enabled = false
//! cancel_check_interval = 64
//!
//! [pool]
//! num_threads = 2
//! "#).unwrap();
//!
//! assert!(!config.sections_enabled);
//! assert_eq!(config.pool.num_threads, Some(2));
//! ```

use serde::{Deserialize, Serialize};

use sectionlist_core::ThreadPoolConfig;

use crate::error::AdapterResult;

/// Configuration for a [`SectionListAdapter`](crate::SectionListAdapter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Whether the fast-scroll section index is maintained.
    pub sections_enabled: bool,
    /// How many items the background scan processes between cancellation checks.
    pub cancel_check_interval: usize,
    /// Thread pool used when the adapter creates its own pool.
    pub pool: ThreadPoolConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            sections_enabled: true,
            cancel_check_interval: 1,
            pool: ThreadPoolConfig::default().thread_name("sectionlist-filter"),
        }
    }
}

impl AdapterConfig {
    /// Parse a configuration from a TOML document. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> AdapterResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize this configuration to a TOML document.
    pub fn to_toml_string(&self) -> AdapterResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Set whether sections are enabled.
    pub fn with_sections(mut self, enabled: bool) -> Self {
        self.sections_enabled = enabled;
        self
    }

    /// Set the cancellation polling interval of the background scan.
    pub fn with_cancel_check_interval(mut self, interval: usize) -> Self {
        self.cancel_check_interval = interval;
        self
    }

    /// Set the thread pool configuration.
    pub fn with_pool(mut self, pool: ThreadPoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// The polling interval actually used; zero is treated as one.
    pub fn effective_check_interval(&self) -> usize {
        self.cancel_check_interval.max(1)
    }
}
