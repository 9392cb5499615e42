use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{CounterSnapshot, TimeWindow, WindowKind};

/// A counter snapshot as read from disk, before validation.
///
/// Any window may be absent or `null`; unknown top-level keys are ignored so
/// documents written by newer or older versions still load.
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub year: Option<TimeWindow>,
    #[serde(default)]
    pub month: Option<TimeWindow>,
    #[serde(default)]
    pub day: Option<TimeWindow>,
}

impl SnapshotDocument {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    fn take(&mut self, kind: WindowKind) -> Option<TimeWindow> {
        match kind {
            WindowKind::Year => self.year.take(),
            WindowKind::Month => self.month.take(),
            WindowKind::Day => self.day.take(),
        }
    }

    /// Apply the document to `snapshot` one window at a time.
    ///
    /// Windows present in the document overwrite the in-memory ones; windows
    /// that are absent or null are seeded from `today` with zero counts.
    /// Returns the windows that had to be seeded.
    pub fn merge_into(
        mut self,
        snapshot: &mut CounterSnapshot,
        today: NaiveDate,
    ) -> Vec<WindowKind> {
        let mut seeded = Vec::new();
        for kind in WindowKind::ALL {
            match self.take(kind) {
                Some(window) => *snapshot.window_mut(kind) = window,
                None => {
                    snapshot.window_mut(kind).reset(kind.marker_for(today));
                    seeded.push(kind);
                }
            }
        }
        seeded
    }
}
