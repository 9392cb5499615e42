//! # rollcount-overrides
//!
//! A small persisted `String -> String` map with the same load/save/clear
//! contract as the counter store, but an independent lifecycle.
//!
//! Unlike the counters, a corrupt file is not overwritten on load: the map is
//! left empty and the file stays as it was until the next explicit save.
//!
//! Reads work on a shared snapshot and never wait for a writer; an
//! [`OverrideView`] can be held across any number of mutations.

mod store;

pub use store::{OverrideStore, OverrideView};
