//! # rollcount-core
//!
//! Year, month and day counters for a closed set of event categories,
//! persisted as a canonical JSON document that repairs itself on load.
//!
//! ## Key Types
//!
//! - [`Counters`] - the file-backed store: `load`, `save`, `add_count`, ...
//! - [`CounterSnapshot`] / [`TimeWindow`] - the plain data record
//! - [`Rollover`] - what [`CounterSnapshot::reconcile`] reset
//! - [`SnapshotDocument`] - lenient on-disk form used for merging

mod counters;
mod document;
mod error;
pub mod persist;
mod rollover;
mod types;

pub use counters::{canonical_json, Counters, SaveReport};
pub use document::SnapshotDocument;
pub use error::StoreError;
pub use rollover::Rollover;
pub use types::{Category, CounterSnapshot, TimeWindow, WindowKind};
