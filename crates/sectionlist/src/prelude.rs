//! Commonly used types.
//!
//! ```
//! use sectionlist::prelude::*;
//! ```

pub use crate::{
    AdapterConfig, AdapterError, AdapterResult, AdapterSignals, CellLoadSlot, FilterPhase, Keyed,
    SectionItem, SectionListAdapter,
};
pub use sectionlist_core::{CancellationToken, ThreadPool, ThreadPoolConfig, UiHandle, UiQueue};
