use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use rollcount_core::{CounterSnapshot, Counters};
use rollcount_overrides::OverrideStore;

use crate::config::StoreConfig;

/// The process-wide pair of stores.
///
/// Construct one at startup and hand out `&StatsContext` (or wrap it in an
/// `Arc`) instead of reaching for globals. Both stores are internally
/// synchronized, so shared references are enough for every operation.
pub struct StatsContext {
    counters: Counters,
    overrides: OverrideStore,
}

impl StatsContext {
    pub fn from_paths(counters_path: impl Into<PathBuf>, overrides_path: impl Into<PathBuf>) -> Self {
        Self {
            counters: Counters::new(counters_path),
            overrides: OverrideStore::new(overrides_path),
        }
    }

    /// Build both stores at the locations named by `config`.
    pub fn open(config: &StoreConfig) -> Self {
        Self::from_paths(config.counters_path(), config.overrides_path())
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    pub fn load_all(&self) -> CounterSnapshot {
        self.load_all_at(Local::now().date_naive())
    }

    /// Load both stores, the counters reconciled against `today`.
    pub fn load_all_at(&self, today: NaiveDate) -> CounterSnapshot {
        let snapshot = self.counters.load_at(today);
        let entries = self.overrides.load();
        tracing::info!(
            counters = %self.counters.path().display(),
            overrides = entries,
            "stores loaded"
        );
        snapshot
    }

    pub fn save_all(&self) -> bool {
        self.save_all_at(Local::now().date_naive())
    }

    /// Save both stores. Returns `true` only if both writes succeeded.
    pub fn save_all_at(&self, date: NaiveDate) -> bool {
        let counters_ok = self.counters.save_at(date).written;
        let overrides_ok = self.overrides.save();
        counters_ok && overrides_ok
    }

    /// Save both stores, then drop their in-memory state.
    pub fn shutdown(&self) -> bool {
        self.shutdown_at(Local::now().date_naive())
    }

    pub fn shutdown_at(&self, date: NaiveDate) -> bool {
        let saved = self.save_all_at(date);
        self.counters.unload();
        self.overrides.clear();
        if !saved {
            tracing::warn!("shutdown completed with unsaved state");
        }
        saved
    }
}
