use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use cadence_db::db::connection::DbConnection;
use cadence_db::db::query::{goal, goal_progress, habit};
use cadence_db::model::goal::{Goal, NewGoal, progress::GoalProgress, progress::NewGoalProgress};

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Loads a goal that must belong to `user_id`.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the goal does not exist or belongs to
/// someone else.
pub async fn get_owned_goal(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    goal_id: Uuid,
) -> ServiceResult<Goal> {
    goal::get_owned(conn, goal_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("goal {goal_id}")))
}

/// ## Summary
/// Creates a goal.
///
/// ## Errors
/// Returns `ServiceError::ValidationError` if the name is blank, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn create_goal(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    name: &str,
    category: &str,
) -> ServiceResult<Goal> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::ValidationError(
            "goal name must not be empty".to_string(),
        ));
    }

    Ok(goal::create_goal(
        conn,
        &NewGoal {
            user_id,
            name,
            category: category.trim(),
        },
    )
    .await?)
}

/// ## Summary
/// Marks a goal completed or reopens it.
///
/// Completing stamps `completed_at` with the current time and stores `note`;
/// reopening clears both.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the goal is not the user's, or a database error.
#[tracing::instrument(skip(conn, note))]
pub async fn set_goal_completed(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    goal_id: Uuid,
    is_completed: bool,
    note: Option<&str>,
) -> ServiceResult<Goal> {
    let current = get_owned_goal(conn, user_id, goal_id).await?;

    // Re-completing keeps the original timestamp
    let completed_at = match (is_completed, current.completed_at) {
        (false, _) => None,
        (true, Some(at)) => Some(at),
        (true, None) => Some(Utc::now()),
    };
    let note = if is_completed { note } else { None };

    let updated = goal::update_completion(conn, goal_id, is_completed, completed_at, note)
        .await?;
    Ok(updated)
}

/// ## Summary
/// Archives (`false`) or restores (`true`) a goal.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the goal is not the user's, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn set_goal_active(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    goal_id: Uuid,
    is_active: bool,
) -> ServiceResult<Goal> {
    get_owned_goal(conn, user_id, goal_id).await?;
    Ok(goal::set_active(conn, goal_id, is_active).await?)
}

/// A "did I move forward today" entry for a goal.
#[derive(Debug, Clone, Deserialize)]
pub struct LogProgressRequest {
    pub goal_id: Uuid,
    pub date: NaiveDate,
    #[serde(default = "default_moved_forward")]
    pub moved_forward: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub source_habit_id: Option<Uuid>,
}

const fn default_moved_forward() -> bool {
    true
}

/// ## Summary
/// Records progress on a goal for a day, replacing any earlier entry for that day.
///
/// A source habit that does not belong to the user is dropped rather than rejected.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the goal is not the user's,
/// `ServiceError::Conflict` if the goal is already completed, or a database error.
#[tracing::instrument(
    skip(conn, request),
    fields(goal_id = %request.goal_id, date = %request.date)
)]
pub async fn log_goal_progress(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    request: &LogProgressRequest,
) -> ServiceResult<GoalProgress> {
    let goal = get_owned_goal(conn, user_id, request.goal_id).await?;
    if goal.is_completed {
        return Err(ServiceError::Conflict(format!(
            "goal {} is completed",
            goal.id
        )));
    }

    let source_habit_id = match request.source_habit_id {
        Some(habit_id) => {
            let owned = habit::get_owned(conn, habit_id, user_id).await?;
            if owned.is_none() {
                tracing::debug!(%habit_id, "Dropping source habit not owned by user");
            }
            owned.map(|h| h.id)
        }
        None => None,
    };

    Ok(goal_progress::upsert(
        conn,
        &NewGoalProgress {
            goal_id: goal.id,
            date: request.date,
            moved_forward: request.moved_forward,
            note: request.note.as_deref(),
            source_habit_id,
        },
    )
    .await?)
}
