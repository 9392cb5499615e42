//! # rollcount
//!
//! Year/month/day event counters and a string override map, each persisted
//! to its own JSON file and owned by a single [`StatsContext`].
//!
//! ```no_run
//! use rollcount::{Category, StatsContext, StoreConfig};
//!
//! let config = StoreConfig::default();
//! let ctx = StatsContext::open(&config);
//! ctx.load_all();
//! ctx.counters().add_count(Category::Collected, 3);
//! ctx.overrides().add("friend-42", "skip");
//! ctx.save_all();
//! ```

mod config;
mod context;

pub use config::{
    LoggingConfig, StoreConfig, CONFIG_FILE_NAME, DEFAULT_COUNTERS_FILE, DEFAULT_OVERRIDES_FILE,
};
pub use context::StatsContext;

pub use rollcount_core::{
    Category, CounterSnapshot, Counters, Rollover, SaveReport, TimeWindow, WindowKind,
};
pub use rollcount_logging::{init_tracing, LogFormat};
pub use rollcount_overrides::{OverrideStore, OverrideView};
