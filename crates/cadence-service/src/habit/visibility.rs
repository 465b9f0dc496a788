//! Which habits appear in the view of one calendar date.

use chrono::NaiveDate;
use serde::Serialize;

use cadence_core::error::CoreResult;
use cadence_core::types::WeekdayCode;
use cadence_core::util::date::add_days;
use cadence_db::model::habit::{Habit, log::HabitLog};

use super::log_index::LogIndex;
use super::recurrence::Recurrence;

/// Progress of a windowed habit within the window containing the viewed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowProgress {
    pub current: u32,
    pub target: u32,
    /// Days left in the window, counting the viewed date.
    pub days_remaining: i64,
    pub is_satisfied: bool,
}

/// A habit as shown for one date.
#[derive(Debug, Clone, Serialize)]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Habit,
    /// Name of the goal the habit feeds, filled in by the caller.
    pub linked_goal_name: Option<String>,
    pub today_log: Option<HabitLog>,
    pub window_progress: Option<WindowProgress>,
}

/// Result of evaluating one habit for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible(Option<WindowProgress>),
}

/// ## Summary
/// Decides whether `habit` is shown on `date`.
///
/// - Daily habits are always shown.
/// - Weekly habits are shown on their configured weekdays only.
/// - Windowed habits are hidden once the window containing `date` has met its
///   target, except on a day that carries its own success log. Dates before
///   the anchor are always shown.
///
/// ## Errors
/// Returns `CoreError::InvalidConfiguration` if the habit's stored rule is invalid.
pub fn decide(habit: &Habit, logs: &LogIndex, date: NaiveDate) -> CoreResult<Visibility> {
    let visibility = match Recurrence::from_habit(habit)? {
        Recurrence::Daily => Visibility::Visible(None),
        Recurrence::Weekly { days } => {
            if days.contains(&WeekdayCode::of(date)) {
                Visibility::Visible(None)
            } else {
                Visibility::Hidden
            }
        }
        Recurrence::Windowed(rule) => {
            let Some(window) = rule.window_containing(habit.anchor_date(), date) else {
                return Ok(Visibility::Visible(None));
            };

            let current = logs.success_count(habit.id, window.start, window.end);
            let progress = WindowProgress {
                current,
                target: rule.target,
                days_remaining: window.days_remaining(date),
                is_satisfied: current >= rule.target,
            };

            let logged_success_on_date = logs
                .log_on(habit.id, date)
                .is_some_and(HabitLog::is_success);

            if progress.is_satisfied && !logged_success_on_date {
                Visibility::Hidden
            } else {
                Visibility::Visible(Some(progress))
            }
        }
    };

    Ok(visibility)
}

/// ## Summary
/// Computes the habits visible on `date`, in input order, each paired with
/// its log for that date.
///
/// A habit whose rule cannot be parsed is kept visible and reported; it never
/// aborts the batch.
#[tracing::instrument(
    skip(habits, logs),
    fields(habit_count = habits.len(), log_count = logs.len())
)]
pub fn visible_habits(habits: &[Habit], logs: &LogIndex, date: NaiveDate) -> Vec<HabitView> {
    habits
        .iter()
        .filter_map(|habit| {
            let window_progress = match decide(habit, logs, date) {
                Ok(Visibility::Hidden) => return None,
                Ok(Visibility::Visible(progress)) => progress,
                Err(error) => {
                    tracing::warn!(
                        habit_id = %habit.id,
                        %error,
                        "Habit has an invalid rule; showing it as due"
                    );
                    None
                }
            };

            Some(HabitView {
                habit: habit.clone(),
                linked_goal_name: None,
                today_log: logs.log_on(habit.id, date).cloned(),
                window_progress,
            })
        })
        .collect()
}

/// ## Summary
/// Date range of logs needed to evaluate `habits` on `date`.
///
/// Any window containing `date` lies within `period - 1` days of it, so the
/// range is widened by the longest windowed period present. Habits with an
/// invalid rule do not widen it.
#[must_use]
pub fn log_fetch_range(habits: &[Habit], date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let reach = habits
        .iter()
        .filter_map(|habit| Recurrence::from_habit(habit).ok())
        .filter_map(|recurrence| recurrence.window_rule().copied())
        .map(|rule| i64::from(rule.period) - 1)
        .max()
        .unwrap_or(0);

    (add_days(date, -reach), add_days(date, reach))
}
