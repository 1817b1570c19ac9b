//! sectionlist - A sectioned list adapter with fast-scroll indexing and
//! asynchronous filtering.
//!
//! The adapter feeds a list or grid view from an ordered in-memory collection.
//! It maintains an alphabetic section index over whatever is currently visible
//! and narrows the visible items by substring filtering on a background thread
//! pool, applying only the result of the most recent filter request.
//!
//! This crate re-exports the runtime plumbing of `sectionlist-core`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sectionlist::prelude::*;
//!
//! let queue = UiQueue::new();
//! let pool = Arc::new(ThreadPool::new(ThreadPoolConfig::with_threads(1)).unwrap());
//! let adapter = SectionListAdapter::with_pool(queue.handle(), AdapterConfig::default(), pool);
//!
//! adapter.signals().data_set_changed.connect(|_| println!("refresh view"));
//! adapter.swap_dataset(vec!["Apple".to_string(), "Banana".to_string()]);
//! adapter.apply_filter("nan");
//!
//! queue.process_until(|| !adapter.is_filter_pending(), Duration::from_secs(5));
//! assert_eq!(adapter.count(), 1);
//! ```

pub use sectionlist_core::*;

mod config;
mod error;
pub mod model;
pub mod prelude;

pub use config::AdapterConfig;
pub use error::{AdapterError, AdapterResult};
pub use model::{
    AdapterSignals, CellLoadSlot, FilterCoordinator, FilterOutcome, FilterPhase, Keyed, Section,
    SectionIndex, SectionItem, SectionLabel, SectionListAdapter, filter_items,
};
