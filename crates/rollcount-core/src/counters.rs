use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};
use rollcount_logging::StoreEvent;

use crate::document::SnapshotDocument;
use crate::error::StoreError;
use crate::persist;
use crate::rollover::Rollover;
use crate::types::{Category, CounterSnapshot, WindowKind};

/// Result of a [`Counters::save_at`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    /// Rollover applied before writing.
    pub rollover: Rollover,
    /// Whether the file write succeeded.
    pub written: bool,
}

/// File-backed year/month/day counters.
///
/// Every operation, including [`Counters::add_count`], goes through one
/// mutex, so increments are never lost and a save never writes a half-updated
/// snapshot. File and parse errors are handled here and never returned.
pub struct Counters {
    path: PathBuf,
    state: Mutex<CounterSnapshot>,
}

impl Counters {
    /// Create counters backed by `path`, seeded with today's date.
    /// Nothing is read or written until [`Counters::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_date(path, today())
    }

    pub fn with_date(path: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(CounterSnapshot::seeded(date)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> CounterSnapshot {
        self.load_at(today())
    }

    /// Read the snapshot file, repair it for `today` and make it current.
    ///
    /// A missing, empty, unreadable or malformed file resets the counters to
    /// zero and writes the defaults back. A readable file is merged in,
    /// missing windows are seeded, stale windows are rolled over, and the
    /// file is rewritten if its text differs from the canonical form.
    pub fn load_at(&self, today: NaiveDate) -> CounterSnapshot {
        let mut state = self.lock();

        let raw = match persist::read_text(&self.path) {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(Some(_)) => {
                self.reset_to_default(&mut state, today, "file is empty");
                return *state;
            }
            Ok(None) => {
                self.reset_to_default(&mut state, today, "file is missing");
                return *state;
            }
            Err(e) => {
                self.reset_to_default(&mut state, today, &format!("unreadable: {}", e));
                return *state;
            }
        };

        let document = match SnapshotDocument::parse(&raw) {
            Ok(document) => document,
            Err(e) => {
                self.reset_to_default(&mut state, today, &format!("malformed: {}", e));
                return *state;
            }
        };

        let seeded = document.merge_into(&mut state, today);
        if !seeded.is_empty() {
            StoreEvent::SnapshotRepaired {
                path: self.path.clone(),
                windows: seeded.iter().map(|k| k.label().to_string()).collect(),
            }
            .emit();
        }

        let rollover = state.reconcile(today);
        if rollover.is_changed() {
            StoreEvent::SnapshotRolledOver {
                path: self.path.clone(),
                granularity: rollover.label().to_string(),
            }
            .emit();
        }

        match canonical_json(&state) {
            Ok(canonical) if canonical != raw => {
                match persist::write_text(&self.path, &canonical) {
                    Ok(()) => StoreEvent::SnapshotReformatted {
                        path: self.path.clone(),
                    }
                    .emit(),
                    Err(e) => self.write_failed(&e),
                }
            }
            Ok(_) => {}
            Err(e) => self.write_failed(&e),
        }

        *state
    }

    pub fn save(&self) -> SaveReport {
        self.save_at(today())
    }

    /// Roll the snapshot over to `date`, then write it unconditionally.
    pub fn save_at(&self, date: NaiveDate) -> SaveReport {
        let mut state = self.lock();
        let rollover = state.reconcile(date);

        let written = match self.write(&state) {
            Ok(()) => {
                StoreEvent::SnapshotSaved {
                    path: self.path.clone(),
                    rolled_over: rollover.is_changed(),
                }
                .emit();
                true
            }
            Err(e) => {
                self.write_failed(&e);
                false
            }
        };

        SaveReport { rollover, written }
    }

    /// Clear the in-memory snapshot (zero counts, zero markers) without
    /// touching the file.
    pub fn unload(&self) {
        *self.lock() = CounterSnapshot::default();
        StoreEvent::SnapshotUnloaded {
            path: self.path.clone(),
        }
        .emit();
    }

    /// Add `amount` to `category` in the year, month and day windows.
    pub fn add_count(&self, category: Category, amount: u64) {
        self.lock().add(category, amount);
    }

    pub fn count(&self, window: WindowKind, category: Category) -> u64 {
        self.lock().count(window, category)
    }

    pub fn marker(&self, window: WindowKind) -> i32 {
        self.lock().marker(window)
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> CounterSnapshot {
        *self.lock()
    }

    pub fn summary_text(&self) -> String {
        self.lock().summary_text()
    }

    fn lock(&self) -> MutexGuard<'_, CounterSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, snapshot: &CounterSnapshot) -> Result<(), StoreError> {
        let canonical = canonical_json(snapshot)?;
        persist::write_text(&self.path, &canonical)
    }

    fn reset_to_default(&self, state: &mut CounterSnapshot, today: NaiveDate, reason: &str) {
        *state = CounterSnapshot::seeded(today);
        StoreEvent::SnapshotReset {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
        .emit();
        if let Err(e) = self.write(state) {
            self.write_failed(&e);
        }
    }

    fn write_failed(&self, error: &StoreError) {
        StoreEvent::SnapshotWriteFailed {
            path: self.path.clone(),
            error: error.to_string(),
        }
        .emit();
    }
}

/// The single text form a snapshot is stored as: pretty-printed JSON with
/// windows in year, month, day order.
pub fn canonical_json(snapshot: &CounterSnapshot) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
