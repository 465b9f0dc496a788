//! Query composition for `goals`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::goals;
use crate::model::goal::{Goal, NewGoal};

/// ## Summary
/// Returns a query for a user's goals, oldest first.
#[must_use]
pub fn by_user(user_id: uuid::Uuid) -> goals::BoxedQuery<'static, diesel::pg::Pg> {
    goals::table
        .filter(goals::user_id.eq(user_id))
        .order((goals::created_at.asc(), goals::id.asc()))
        .into_boxed()
}

/// ## Summary
/// Returns a query for goals still in progress (active and not completed).
#[must_use]
pub fn in_progress_by_user(user_id: uuid::Uuid) -> goals::BoxedQuery<'static, diesel::pg::Pg> {
    by_user(user_id)
        .filter(goals::is_active.eq(true))
        .filter(goals::is_completed.eq(false))
}

/// ## Summary
/// Loads a goal only if it belongs to `user_id`.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_owned(
    conn: &mut DbConnection<'_>,
    goal_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<Goal>> {
    by_user(user_id)
        .filter(goals::id.eq(goal_id))
        .select(Goal::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads the names of the user's goals among `goal_ids`.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn names_by_id(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
    goal_ids: &[uuid::Uuid],
) -> QueryResult<Vec<(uuid::Uuid, String)>> {
    if goal_ids.is_empty() {
        return Ok(Vec::new());
    }

    goals::table
        .filter(goals::user_id.eq(user_id))
        .filter(goals::id.eq_any(goal_ids.to_vec()))
        .select((goals::id, goals::name))
        .load(conn)
        .await
}

/// ## Summary
/// Inserts a goal and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn create_goal(
    conn: &mut DbConnection<'_>,
    new_goal: &NewGoal<'_>,
) -> QueryResult<Goal> {
    diesel::insert_into(goals::table)
        .values(new_goal)
        .returning(Goal::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Writes the completion state of a goal.
///
/// ## Errors
/// Returns an error if the goal does not exist or the database operation fails.
pub async fn update_completion(
    conn: &mut DbConnection<'_>,
    goal_id: uuid::Uuid,
    is_completed: bool,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
    completion_note: Option<&str>,
) -> QueryResult<Goal> {
    diesel::update(goals::table.find(goal_id))
        .set((
            goals::is_completed.eq(is_completed),
            goals::completed_at.eq(completed_at),
            goals::completion_note.eq(completion_note),
            goals::updated_at.eq(chrono::Utc::now()),
        ))
        .returning(Goal::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Sets the active flag of a goal (archive / restore).
///
/// ## Errors
/// Returns an error if the goal does not exist or the database operation fails.
pub async fn set_active(
    conn: &mut DbConnection<'_>,
    goal_id: uuid::Uuid,
    is_active: bool,
) -> QueryResult<Goal> {
    diesel::update(goals::table.find(goal_id))
        .set((
            goals::is_active.eq(is_active),
            goals::updated_at.eq(chrono::Utc::now()),
        ))
        .returning(Goal::as_returning())
        .get_result(conn)
        .await
}
