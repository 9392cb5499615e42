//! Calendar rollover for [`CounterSnapshot`].
//!
//! A change at a coarse granularity cascades into every finer window: when the
//! year moves on, month and day are reset too even if their stored markers
//! happen to equal the new month and day numbers.

use chrono::NaiveDate;

use crate::types::{CounterSnapshot, WindowKind};

/// Coarsest window reset by a reconcile, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rollover {
    #[default]
    None,
    /// Only the day window was reset.
    Day,
    /// Month and day windows were reset.
    Month,
    /// All three windows were reset.
    Year,
}

impl Rollover {
    pub fn is_changed(&self) -> bool {
        *self != Rollover::None
    }

    /// Windows cleared by this rollover, coarsest first.
    pub fn reset_windows(&self) -> &'static [WindowKind] {
        match self {
            Rollover::None => &[],
            Rollover::Day => &[WindowKind::Day],
            Rollover::Month => &[WindowKind::Month, WindowKind::Day],
            Rollover::Year => &[WindowKind::Year, WindowKind::Month, WindowKind::Day],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rollover::None => "none",
            Rollover::Day => "day",
            Rollover::Month => "month",
            Rollover::Year => "year",
        }
    }
}

impl CounterSnapshot {
    /// Reset every window whose marker no longer matches `today`, cascading
    /// from the coarsest stale window downwards.
    ///
    /// Calling it twice with the same date is a no-op the second time.
    pub fn reconcile(&mut self, today: NaiveDate) -> Rollover {
        let rollover = if self.year.marker != WindowKind::Year.marker_for(today) {
            Rollover::Year
        } else if self.month.marker != WindowKind::Month.marker_for(today) {
            Rollover::Month
        } else if self.day.marker != WindowKind::Day.marker_for(today) {
            Rollover::Day
        } else {
            return Rollover::None;
        };

        for &kind in rollover.reset_windows() {
            self.window_mut(kind).reset(kind.marker_for(today));
        }
        rollover
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filled(on: NaiveDate) -> CounterSnapshot {
        let mut snap = CounterSnapshot::seeded(on);
        snap.add(Category::Collected, 10);
        snap.add(Category::Helped, 2);
        snap
    }

    #[test]
    fn test_same_day_is_unchanged() {
        let mut snap = filled(date(2026, 5, 20));
        let before = snap;
        assert_eq!(snap.reconcile(date(2026, 5, 20)), Rollover::None);
        assert_eq!(snap, before);
    }

    #[test]
    fn test_new_day_resets_only_day() {
        let mut snap = filled(date(2026, 5, 20));
        assert_eq!(snap.reconcile(date(2026, 5, 21)), Rollover::Day);
        assert_eq!(snap.day, crate::types::TimeWindow::starting(21));
        assert_eq!(snap.month.collected, 10);
        assert_eq!(snap.year.collected, 10);
    }

    #[test]
    fn test_new_month_resets_month_and_day() {
        let mut snap = filled(date(2026, 5, 20));
        assert_eq!(snap.reconcile(date(2026, 6, 20)), Rollover::Month);
        assert_eq!(snap.month.marker, 6);
        assert_eq!(snap.month.collected, 0);
        // Same day-of-month number, still reset by the cascade.
        assert_eq!(snap.day.marker, 20);
        assert_eq!(snap.day.collected, 0);
        assert_eq!(snap.year.collected, 10);
    }

    #[test]
    fn test_new_year_cascades_even_with_matching_month_and_day() {
        let mut snap = filled(date(2025, 5, 20));
        assert_eq!(snap.reconcile(date(2026, 5, 20)), Rollover::Year);
        assert_eq!(snap, CounterSnapshot::seeded(date(2026, 5, 20)));
    }

    #[test]
    fn test_going_backwards_also_resets() {
        let mut snap = filled(date(2026, 5, 20));
        assert_eq!(snap.reconcile(date(2026, 5, 19)), Rollover::Day);
        assert_eq!(snap.day.marker, 19);
    }

    #[test]
    fn test_empty_snapshot_always_rolls_over_year() {
        let mut snap = CounterSnapshot::default();
        assert_eq!(snap.reconcile(date(2026, 1, 1)), Rollover::Year);
        assert_eq!(snap, CounterSnapshot::seeded(date(2026, 1, 1)));
    }

    #[test]
    fn test_rollover_flags() {
        assert!(!Rollover::None.is_changed());
        assert!(Rollover::Day.is_changed());
        assert_eq!(Rollover::Month.reset_windows().len(), 2);
        assert_eq!(Rollover::Year.label(), "year");
    }
}
