//! The sectioned list model.
//!
//! # Core Types
//!
//! - `SectionItem`: The trait items implement to expose a section key
//! - `SectionIndex`: Run-length section boundaries of an item sequence
//! - `FilterCoordinator`: Supersession and acceptance rules for background scans
//! - `SectionListAdapter`: The facade a list or grid view consumes
//! - `CellLoadSlot`: Cancel-and-replace content loading for a single cell
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐  swap   ┌────────────────────┐  build  ┌──────────────┐
//! │ Item source │────────>│ SectionListAdapter │────────>│ SectionIndex │
//! └─────────────┘         └────────────────────┘         └──────────────┘
//!                            │              ^
//!                  apply     │              │ complete (UI thread)
//!                            v              │
//!                 ┌───────────────────┐  scan on pool  ┌──────────────┐
//!                 │ FilterCoordinator │───────────────>│ filter_items │
//!                 └───────────────────┘                └──────────────┘
//! ```

mod adapter;
mod cell;
pub mod coordinator;
mod filter;
mod item;
mod section;

pub use adapter::{AdapterSignals, SectionListAdapter};
pub use cell::CellLoadSlot;
pub use coordinator::{Completion, DiscardReason, FilterCoordinator, FilterPhase, FilterTicket};
pub use filter::{FilterOutcome, filter_items};
pub use item::{Keyed, SectionItem};
pub use section::{Section, SectionIndex, SectionLabel};
