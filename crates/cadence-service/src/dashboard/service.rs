use std::collections::HashMap;

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use cadence_core::config::TrackerConfig;
use cadence_db::db::connection::DbConnection;
use cadence_db::db::query::{daily_log, goal, goal_progress, habit, habit_log, task, user};
use cadence_db::model::goal::{Goal, progress::GoalProgress};
use cadence_db::model::habit::Habit;

use super::{Dashboard, GoalView};
use crate::error::{ServiceError, ServiceResult};
use crate::habit::log_index::LogIndex;
use crate::habit::sweep::{close_expired_windows, should_sweep};
use crate::habit::visibility::{log_fetch_range, visible_habits};

/// ## Summary
/// Builds the dashboard of `user_id` for `date`.
///
/// When `date` is current relative to `today` (see [`should_sweep`]), expired
/// habit windows are closed as of `today` before anything is read, so the
/// returned habits already reflect new `FAILED` logs.
///
/// ## Side Effects
/// May insert `FAILED` habit logs.
///
/// ## Errors
/// Returns `ServiceError::NotFound` for an unknown user, or a database error.
#[tracing::instrument(skip(conn, tracker))]
pub async fn build_dashboard(
    conn: &mut DbConnection<'_>,
    tracker: &TrackerConfig,
    user_id: Uuid,
    date: NaiveDate,
    today: NaiveDate,
) -> ServiceResult<Dashboard> {
    user::get_user(conn, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user {user_id}")))?;

    let sweep = if should_sweep(date, today, tracker.sweep_lookback_days) {
        Some(close_expired_windows(conn, user_id, today).await?)
    } else {
        tracing::debug!("Viewing history; skipping window sweep");
        None
    };

    let habits: Vec<Habit> = habit::active_by_user(user_id)
        .select(Habit::as_select())
        .load(conn)
        .await?;

    let habit_ids: Vec<Uuid> = habits.iter().map(|h| h.id).collect();
    let (start, end) = log_fetch_range(&habits, date);
    let logs = LogIndex::new(habit_log::load_between(conn, &habit_ids, start, end).await?);

    let goals: Vec<Goal> = goal::in_progress_by_user(user_id)
        .select(Goal::as_select())
        .load(conn)
        .await?;

    let goal_ids: Vec<Uuid> = goals.iter().map(|g| g.id).collect();
    let mut histories: HashMap<Uuid, Vec<GoalProgress>> = HashMap::new();
    let progress = goal_progress::load_for_goals(conn, &goal_ids).await?;
    for entry in progress {
        histories.entry(entry.goal_id).or_default().push(entry);
    }

    let mut linked_goal_ids: Vec<Uuid> = habits.iter().filter_map(|h| h.linked_goal_id).collect();
    linked_goal_ids.sort_unstable();
    linked_goal_ids.dedup();
    let goal_names: HashMap<Uuid, String> = goal::names_by_id(conn, user_id, &linked_goal_ids)
        .await?
        .into_iter()
        .collect();

    let mut habit_views = visible_habits(&habits, &logs, date);
    for view in &mut habit_views {
        view.linked_goal_name = view
            .habit
            .linked_goal_id
            .and_then(|goal_id| goal_names.get(&goal_id).cloned());
    }

    let daily_log = daily_log::get_for_day(conn, user_id, date).await?;

    let dashboard = Dashboard {
        date,
        daily_log,
        habits: habit_views,
        goals: goals
            .into_iter()
            .map(|goal| {
                let logs = histories.remove(&goal.id).unwrap_or_default();
                let today_progress = logs.iter().find(|entry| entry.date == date).cloned();
                GoalView {
                    today_progress,
                    logs,
                    goal,
                }
            })
            .collect(),
        tasks: task::load_for_day(conn, user_id, date).await?,
        sweep,
    };

    tracing::debug!(
        habits = dashboard.habits.len(),
        goals = dashboard.goals.len(),
        tasks = dashboard.tasks.len(),
        "Dashboard assembled"
    );

    Ok(dashboard)
}
