//! Auto-fail sweep for windowed habits.
//!
//! Every fully elapsed window whose success count fell short of the target is
//! closed with a `FAILED` log on its last day. The sweep is lazy: it runs on
//! "current" dashboard reads rather than on a schedule.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use uuid::Uuid;

use cadence_core::error::CoreResult;
use cadence_core::util::date::add_days;
use cadence_db::db::connection::DbConnection;
use cadence_db::db::enums::{Frequency, LogStatus};
use cadence_db::db::query::{habit, habit_log};
use cadence_db::model::habit::{Habit, log::NewHabitLog};

use super::log_index::LogIndex;
use super::recurrence::Recurrence;
use super::window::Window;
use crate::error::ServiceResult;

/// ## Summary
/// Whether a read of `view_date` should close expired windows first.
///
/// Dates at most `lookback_days` before `today` (and any future date) count as
/// current; older dates are history views and never write.
#[must_use]
pub fn should_sweep(view_date: NaiveDate, today: NaiveDate, lookback_days: u32) -> bool {
    view_date >= add_days(today, -i64::from(lookback_days))
}

/// An elapsed window that missed its target and has no `FAILED` log yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredWindow {
    pub habit_id: Uuid,
    pub window: Window,
    pub successes: u32,
    pub target: u32,
}

impl ExpiredWindow {
    /// Note stored on the `FAILED` log, e.g. `"1/2"`.
    #[must_use]
    pub fn note(&self) -> String {
        format!("{}/{}", self.successes, self.target)
    }

    /// The `FAILED` log that closes this window.
    #[must_use]
    pub fn failed_log<'a>(&self, note: &'a str) -> NewHabitLog<'a> {
        NewHabitLog {
            habit_id: self.habit_id,
            date: self.window.end,
            status: LogStatus::Failed,
            entry_value: None,
            note: Some(note),
        }
    }
}

/// Outcome of one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Active windowed habits looked at.
    pub habits_examined: usize,
    /// `FAILED` logs written.
    pub failed_inserted: usize,
    /// Inserts that hit an existing log for the same day.
    pub conflicts: usize,
    /// Habits abandoned because of a bad rule or a storage error.
    pub habits_skipped: usize,
}

/// ## Summary
/// Lists the elapsed windows of `habit` that must be closed as of `as_of`.
///
/// Non-windowed habits and habits whose anchor lies after `as_of` yield
/// nothing. Windows that already carry a `FAILED` log on their last day are
/// left alone.
///
/// ## Errors
/// Returns `CoreError::InvalidConfiguration` if the habit's stored rule is invalid.
pub fn plan_expired_windows(
    habit: &Habit,
    logs: &LogIndex,
    as_of: NaiveDate,
) -> CoreResult<Vec<ExpiredWindow>> {
    let Some(rule) = Recurrence::from_habit(habit)?.window_rule().copied() else {
        return Ok(Vec::new());
    };

    let expired = rule
        .elapsed_windows(habit.anchor_date(), as_of)
        .filter(|window| {
            logs.log_on(habit.id, window.end)
                .is_none_or(|log| log.status != LogStatus::Failed)
        })
        .filter_map(|window| {
            let successes = logs.success_count(habit.id, window.start, window.end);
            (successes < rule.target).then_some(ExpiredWindow {
                habit_id: habit.id,
                window,
                successes,
                target: rule.target,
            })
        })
        .collect();

    Ok(expired)
}

/// ## Summary
/// Closes every expired window of the user's active windowed habits as of `as_of`.
///
/// Logs for all candidate habits are fetched in one query. Each insert is
/// `ON CONFLICT DO NOTHING`, so repeated or concurrent runs never write a
/// second log for the same day.
///
/// ## Side Effects
/// Inserts `FAILED` habit logs.
///
/// ## Errors
/// Returns an error if loading habits or logs fails. Failures scoped to one
/// habit are logged and counted in [`SweepReport::habits_skipped`].
#[tracing::instrument(skip(conn))]
pub async fn close_expired_windows(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    as_of: NaiveDate,
) -> ServiceResult<SweepReport> {
    let habits: Vec<Habit> = habit::active_by_user_and_frequency(user_id, Frequency::Windowed)
        .select(Habit::as_select())
        .load(conn)
        .await?;

    let mut report = SweepReport {
        habits_examined: habits.len(),
        ..SweepReport::default()
    };

    if habits.is_empty() {
        return Ok(report);
    }

    let habit_ids: Vec<Uuid> = habits.iter().map(|h| h.id).collect();
    let logs = LogIndex::new(habit_log::load_until(conn, &habit_ids, as_of).await?);

    for habit in &habits {
        let expired = match plan_expired_windows(habit, &logs, as_of) {
            Ok(expired) => expired,
            Err(error) => {
                tracing::warn!(
                    habit_id = %habit.id,
                    %error,
                    "Skipping habit with invalid window rule"
                );
                report.habits_skipped += 1;
                continue;
            }
        };

        for window in &expired {
            let note = window.note();
            let failed = window.failed_log(&note);
            match habit_log::insert_if_absent(conn, &failed).await {
                Ok(true) => {
                    tracing::info!(
                        habit_id = %habit.id,
                        window_end = %window.window.end,
                        note = %note,
                        "Closed expired window as failed"
                    );
                    report.failed_inserted += 1;
                }
                Ok(false) => {
                    tracing::debug!(
                        habit_id = %habit.id,
                        window_end = %window.window.end,
                        "Window already has a log on its last day"
                    );
                    report.conflicts += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        habit_id = %habit.id,
                        %error,
                        "Failed to close expired window"
                    );
                    report.habits_skipped += 1;
                    break;
                }
            }
        }
    }

    tracing::debug!(?report, "Sweep finished");

    Ok(report)
}
