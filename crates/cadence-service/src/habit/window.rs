//! Rolling windows of windowed habits.
//!
//! Windows are consecutive runs of `period` days starting at the habit's
//! anchor date; window `k` covers `[anchor + k*period, anchor + (k+1)*period - 1]`.

use chrono::NaiveDate;
use serde::Serialize;

use cadence_core::util::date::{add_days, days_between};

/// `target` successes required within every `period` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowRule {
    pub target: u32,
    pub period: u32,
}

/// One concrete window of a windowed habit, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub index: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Days left in the window counting `date` itself.
    #[must_use]
    pub fn days_remaining(&self, date: NaiveDate) -> i64 {
        days_between(date, self.end) + 1
    }
}

impl WindowRule {
    /// Window number `index` counted from `anchor`.
    #[must_use]
    pub fn window_at(&self, anchor: NaiveDate, index: i64) -> Window {
        let period = i64::from(self.period);
        let start = add_days(anchor, index.saturating_mul(period));
        Window {
            index,
            start,
            end: add_days(start, period - 1),
        }
    }

    /// Window containing `date`, or `None` if `date` is before the anchor.
    #[must_use]
    pub fn window_containing(&self, anchor: NaiveDate, date: NaiveDate) -> Option<Window> {
        let days_active = days_between(anchor, date);
        if days_active < 0 {
            return None;
        }
        Some(self.window_at(anchor, days_active / i64::from(self.period)))
    }

    /// Number of windows that ended strictly before `as_of`.
    ///
    /// The window containing `as_of` is still open and is not counted.
    #[must_use]
    pub fn completed_windows(&self, anchor: NaiveDate, as_of: NaiveDate) -> i64 {
        let days_active = days_between(anchor, as_of);
        if days_active < 0 {
            return 0;
        }
        days_active / i64::from(self.period)
    }

    /// All windows that ended strictly before `as_of`, oldest first.
    pub fn elapsed_windows(
        &self,
        anchor: NaiveDate,
        as_of: NaiveDate,
    ) -> impl Iterator<Item = Window> + '_ {
        (0..self.completed_windows(anchor, as_of))
            .map(move |index| self.window_at(anchor, index))
    }
}
