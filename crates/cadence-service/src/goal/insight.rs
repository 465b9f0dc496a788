//! Data handed to the external goal insight generator.
//!
//! Only the context is built here; turning it into narrative text happens elsewhere.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use uuid::Uuid;

use cadence_core::util::date::ISO_DATE_FORMAT;
use cadence_db::db::connection::DbConnection;
use cadence_db::db::enums::Frequency;
use cadence_db::db::query::{goal_progress, habit, habit_log};
use cadence_db::model::goal::{Goal, progress::GoalProgress};
use cadence_db::model::habit::Habit;

use super::service::get_owned_goal;
use crate::error::{ServiceError, ServiceResult};
use crate::habit::log_index::LogIndex;
use crate::habit::stats::percentage;

/// Histories up to this length are sent whole.
const MOMENTUM_FULL_LIMIT: usize = 30;
/// Earliest entries kept from a longer history.
const MOMENTUM_HEAD: usize = 5;
/// Latest entries kept from a longer history.
const MOMENTUM_TAIL: usize = 25;

const ONGOING: &str = "Ongoing";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightContext {
    pub goal: String,
    pub category: String,
    pub start_date: String,
    /// Completion date, or `"Ongoing"`.
    pub end_date: String,
    pub habits_summary: Vec<HabitSummary>,
    pub momentum_logs: Vec<MomentumLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub name: String,
    pub frequency: Frequency,
    /// Share of logs that are successes, e.g. `"67%"`.
    pub consistency_rate: String,
    pub total_logs: u64,
    pub successes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MomentumLog {
    pub date: NaiveDate,
    pub moved_forward: bool,
    pub note: String,
}

/// ## Summary
/// Builds the insight context of `goal` from its linked habits, their logs and
/// the goal's progress history.
#[must_use]
pub fn build_insight_context(
    goal: &Goal,
    habits: &[Habit],
    logs: &LogIndex,
    progress: &[GoalProgress],
) -> InsightContext {
    let habits_summary = habits
        .iter()
        .map(|habit| {
            let (total_logs, successes) = logs
                .logs_for(habit.id)
                .fold((0_u64, 0_u64), |(total, successes), log| {
                    (total + 1, successes + u64::from(log.is_success()))
                });

            HabitSummary {
                name: habit.name.clone(),
                frequency: habit.frequency,
                consistency_rate: format!("{}%", percentage(successes, total_logs)),
                total_logs,
                successes,
            }
        })
        .collect();

    let start_date = goal.created_at.format(ISO_DATE_FORMAT);
    let end_date = goal.completed_at.map_or_else(
        || ONGOING.to_string(),
        |at| at.format(ISO_DATE_FORMAT).to_string(),
    );

    InsightContext {
        goal: goal.name.clone(),
        category: goal.category.clone(),
        start_date: start_date.to_string(),
        end_date,
        habits_summary,
        momentum_logs: momentum_logs(progress),
    }
}

/// Chronological progress entries, trimmed to the start and the end of long histories.
fn momentum_logs(progress: &[GoalProgress]) -> Vec<MomentumLog> {
    let mut ordered: Vec<&GoalProgress> = progress.iter().collect();
    ordered.sort_by_key(|entry| (entry.date, entry.created_at));

    if ordered.len() > MOMENTUM_FULL_LIMIT {
        let tail = ordered.split_off(ordered.len() - MOMENTUM_TAIL);
        ordered.truncate(MOMENTUM_HEAD);
        ordered.extend(tail);
    }

    let mut seen = std::collections::HashSet::new();
    ordered
        .into_iter()
        .filter(|entry| seen.insert(entry.id))
        .map(|entry| MomentumLog {
            date: entry.date,
            moved_forward: entry.moved_forward,
            note: entry.note.clone().unwrap_or_default(),
        })
        .collect()
}

/// ## Summary
/// Loads everything the insight context of one of the user's completed goals
/// needs and builds it.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the goal is not the user's,
/// `ServiceError::Conflict` if the goal is not completed yet, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn load_insight_context(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    goal_id: Uuid,
) -> ServiceResult<InsightContext> {
    let goal = get_owned_goal(conn, user_id, goal_id).await?;
    if !goal.is_completed {
        return Err(ServiceError::Conflict(format!(
            "goal {} must be completed to generate insights",
            goal.id
        )));
    }

    let habits: Vec<Habit> = habit::linked_to_goal(goal.id)
        .select(Habit::as_select())
        .load(conn)
        .await?;
    let habit_ids: Vec<Uuid> = habits.iter().map(|h| h.id).collect();
    let logs = LogIndex::new(habit_log::load_all(conn, &habit_ids).await?);
    let progress = goal_progress::load_for_goal(conn, goal.id).await?;

    Ok(build_insight_context(&goal, &habits, &logs, &progress))
}
