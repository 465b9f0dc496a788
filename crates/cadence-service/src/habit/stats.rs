//! Streak and consistency statistics of a single habit.

use chrono::NaiveDate;
use serde::Serialize;

use cadence_core::util::date::{add_days, days_between};
use cadence_db::model::habit::{Habit, log::HabitLog};

/// Lifetime statistics of one habit as of a given day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HabitStats {
    pub total_logs: u64,
    pub successes: u64,
    /// Consecutive success days ending today, or yesterday if today is not logged yet.
    pub current_streak: u64,
    pub best_streak: u64,
    /// Successes per day since the habit was created, as a whole percentage.
    pub consistency: u64,
}

/// ## Summary
/// Computes streaks and consistency for `habit` from its logs.
///
/// Logs dated after `today` are ignored. `logs` may be in any order.
#[must_use]
pub fn habit_stats<'a>(
    habit: &Habit,
    logs: impl IntoIterator<Item = &'a HabitLog>,
    today: NaiveDate,
) -> HabitStats {
    let mut success_days: Vec<NaiveDate> = Vec::new();
    let mut total_logs = 0_u64;

    let logs = logs.into_iter().filter(|log| log.date <= today);
    for log in logs {
        total_logs += 1;
        if log.is_success() {
            success_days.push(log.date);
        }
    }

    success_days.sort_unstable();
    success_days.dedup();

    let successes = u64::try_from(success_days.len()).unwrap_or(u64::MAX);
    let days_tracked = u64::try_from(days_between(habit.anchor_date(), today) + 1)
        .unwrap_or(0)
        .max(1);

    HabitStats {
        total_logs,
        successes,
        current_streak: current_streak(&success_days, today),
        best_streak: best_streak(&success_days),
        consistency: percentage(successes, days_tracked).min(100),
    }
}

/// `numerator / denominator` as a whole percentage, rounding ties to even.
pub(crate) fn percentage(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let scaled = numerator.saturating_mul(100);
    let quotient = scaled / denominator;
    let twice_remainder = (scaled % denominator) * 2;

    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// `days` must be sorted and free of duplicates.
fn current_streak(days: &[NaiveDate], today: NaiveDate) -> u64 {
    let Some(&last) = days.last() else {
        return 0;
    };
    if last != today && last != add_days(today, -1) {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2).rev() {
        if days_between(pair[0], pair[1]) != 1 {
            break;
        }
        streak += 1;
    }
    streak
}

/// `days` must be sorted and free of duplicates.
fn best_streak(days: &[NaiveDate]) -> u64 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        run = match previous {
            Some(prev) if days_between(prev, day) == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}
