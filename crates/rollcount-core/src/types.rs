use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Event categories tracked by every window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Collected,
    Helped,
    Watered,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Collected, Category::Helped, Category::Watered];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Collected => "collected",
            Category::Helped => "helped",
            Category::Watered => "watered",
        }
    }
}

/// The three nested accumulation periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Year,
    Month,
    Day,
}

impl WindowKind {
    /// Coarsest first.
    pub const ALL: [WindowKind; 3] = [WindowKind::Year, WindowKind::Month, WindowKind::Day];

    pub fn label(&self) -> &'static str {
        match self {
            WindowKind::Year => "year",
            WindowKind::Month => "month",
            WindowKind::Day => "day",
        }
    }

    /// The calendar value this window represents on `date`:
    /// year number, month of year (1-12) or day of month (1-31).
    pub fn marker_for(&self, date: NaiveDate) -> i32 {
        match self {
            WindowKind::Year => date.year(),
            WindowKind::Month => date.month() as i32,
            WindowKind::Day => date.day() as i32,
        }
    }
}

/// Counters accumulated during one calendar period.
///
/// Serialized as `{"time": .., "collected": .., "helped": .., "watered": ..}`.
/// Missing fields read as zero, negative counts read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeWindow {
    #[serde(rename = "time")]
    pub marker: i32,
    #[serde(deserialize_with = "non_negative::deserialize")]
    pub collected: u64,
    #[serde(deserialize_with = "non_negative::deserialize")]
    pub helped: u64,
    #[serde(deserialize_with = "non_negative::deserialize")]
    pub watered: u64,
}

/// Integer counts, with anything below zero clamped to zero. Fractions and
/// non-numbers are still rejected.
mod non_negative {
    use super::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Unsigned(u64),
        Signed(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawCount::deserialize(deserializer)? {
            RawCount::Unsigned(n) => n,
            RawCount::Signed(n) => n.max(0) as u64,
        })
    }
}

impl TimeWindow {
    pub fn starting(marker: i32) -> Self {
        Self {
            marker,
            ..Self::default()
        }
    }

    /// Zero all counts and move to a new period.
    pub fn reset(&mut self, marker: i32) {
        *self = Self::starting(marker);
    }

    pub fn count(&self, category: Category) -> u64 {
        match category {
            Category::Collected => self.collected,
            Category::Helped => self.helped,
            Category::Watered => self.watered,
        }
    }

    pub fn add(&mut self, category: Category, amount: u64) {
        let slot = match category {
            Category::Collected => &mut self.collected,
            Category::Helped => &mut self.helped,
            Category::Watered => &mut self.watered,
        };
        *slot = slot.saturating_add(amount);
    }
}

/// Year, month and day windows held together.
///
/// After [`CounterSnapshot::reconcile`] with some date, each window's marker
/// equals that date's year, month and day respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub year: TimeWindow,
    pub month: TimeWindow,
    pub day: TimeWindow,
}

impl CounterSnapshot {
    /// All counts zero, markers set from `date`.
    pub fn seeded(date: NaiveDate) -> Self {
        Self {
            year: TimeWindow::starting(WindowKind::Year.marker_for(date)),
            month: TimeWindow::starting(WindowKind::Month.marker_for(date)),
            day: TimeWindow::starting(WindowKind::Day.marker_for(date)),
        }
    }

    pub fn window(&self, kind: WindowKind) -> &TimeWindow {
        match kind {
            WindowKind::Year => &self.year,
            WindowKind::Month => &self.month,
            WindowKind::Day => &self.day,
        }
    }

    pub fn window_mut(&mut self, kind: WindowKind) -> &mut TimeWindow {
        match kind {
            WindowKind::Year => &mut self.year,
            WindowKind::Month => &mut self.month,
            WindowKind::Day => &mut self.day,
        }
    }

    /// Add `amount` to `category` in all three windows.
    pub fn add(&mut self, category: Category, amount: u64) {
        for kind in WindowKind::ALL {
            self.window_mut(kind).add(category, amount);
        }
    }

    pub fn count(&self, kind: WindowKind, category: Category) -> u64 {
        self.window(kind).count(category)
    }

    pub fn marker(&self, kind: WindowKind) -> i32 {
        self.window(kind).marker
    }

    /// Fixed-layout human readable report, one line per window.
    pub fn summary_text(&self) -> String {
        WindowKind::ALL
            .iter()
            .map(|&kind| {
                let heading = match kind {
                    WindowKind::Year => "This year ",
                    WindowKind::Month => "This month",
                    WindowKind::Day => "Today     ",
                };
                let w = self.window(kind);
                format!(
                    "{}  collected: {} helped: {} watered: {}",
                    heading, w.collected, w.helped, w.watered
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
