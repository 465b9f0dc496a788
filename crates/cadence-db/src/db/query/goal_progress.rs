//! Query composition for `goal_progress`.

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::goal_progress;
use crate::model::goal::progress::{GoalProgress, NewGoalProgress};

/// ## Summary
/// Loads the progress histories of several goals, newest first.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn load_for_goals(
    conn: &mut DbConnection<'_>,
    goal_ids: &[uuid::Uuid],
) -> QueryResult<Vec<GoalProgress>> {
    if goal_ids.is_empty() {
        return Ok(Vec::new());
    }

    goal_progress::table
        .filter(goal_progress::goal_id.eq_any(goal_ids.to_vec()))
        .order((
            goal_progress::date.desc(),
            goal_progress::created_at.desc(),
        ))
        .select(GoalProgress::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads the full progress history of a goal in chronological order.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn load_for_goal(
    conn: &mut DbConnection<'_>,
    goal_id: uuid::Uuid,
) -> QueryResult<Vec<GoalProgress>> {
    goal_progress::table
        .filter(goal_progress::goal_id.eq(goal_id))
        .order((goal_progress::date.asc(), goal_progress::created_at.asc()))
        .select(GoalProgress::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Inserts or updates the progress entry for `(goal_id, date)`.
///
/// ## Errors
/// Returns an error if the database operation fails.
#[tracing::instrument(
    skip(conn, progress),
    fields(goal_id = %progress.goal_id, date = %progress.date)
)]
pub async fn upsert(
    conn: &mut DbConnection<'_>,
    progress: &NewGoalProgress<'_>,
) -> QueryResult<GoalProgress> {
    diesel::insert_into(goal_progress::table)
        .values(progress)
        .on_conflict((goal_progress::goal_id, goal_progress::date))
        .do_update()
        .set((
            goal_progress::moved_forward.eq(excluded(goal_progress::moved_forward)),
            goal_progress::note.eq(excluded(goal_progress::note)),
            goal_progress::source_habit_id.eq(excluded(goal_progress::source_habit_id)),
            goal_progress::updated_at.eq(chrono::Utc::now()),
        ))
        .returning(GoalProgress::as_returning())
        .get_result(conn)
        .await
}
