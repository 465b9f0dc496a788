//! Query composition for `habits`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::enums::Frequency;
use crate::db::schema::habits;
use crate::model::habit::{Habit, HabitChangeset, NewHabit};

/// ## Summary
/// Returns a query to select all habits.
#[must_use]
pub fn all() -> habits::BoxedQuery<'static, diesel::pg::Pg> {
    habits::table.into_boxed()
}

/// ## Summary
/// Returns a query for a user's habits in display order (oldest first).
#[must_use]
pub fn by_user(user_id: uuid::Uuid) -> habits::BoxedQuery<'static, diesel::pg::Pg> {
    all()
        .filter(habits::user_id.eq(user_id))
        .order((habits::created_at.asc(), habits::id.asc()))
}

/// ## Summary
/// Returns a query for a user's active habits in display order.
#[must_use]
pub fn active_by_user(user_id: uuid::Uuid) -> habits::BoxedQuery<'static, diesel::pg::Pg> {
    by_user(user_id).filter(habits::is_active.eq(true))
}

/// ## Summary
/// Returns a query for a user's active habits of one frequency.
#[must_use]
pub fn active_by_user_and_frequency(
    user_id: uuid::Uuid,
    frequency: Frequency,
) -> habits::BoxedQuery<'static, diesel::pg::Pg> {
    active_by_user(user_id)
        .filter(habits::frequency.eq(frequency))
}

/// ## Summary
/// Returns a query for habits linked to a goal.
#[must_use]
pub fn linked_to_goal(goal_id: uuid::Uuid) -> habits::BoxedQuery<'static, diesel::pg::Pg> {
    all()
        .filter(habits::linked_goal_id.eq(goal_id))
        .order((habits::created_at.asc(), habits::id.asc()))
}

/// ## Summary
/// Loads a habit only if it belongs to `user_id`.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_owned(
    conn: &mut DbConnection<'_>,
    habit_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<Habit>> {
    by_user(user_id)
        .filter(habits::id.eq(habit_id))
        .select(Habit::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts a habit and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
#[tracing::instrument(
    skip(conn, new_habit),
    fields(user_id = %new_habit.user_id, frequency = %new_habit.frequency)
)]
pub async fn create_habit(
    conn: &mut DbConnection<'_>,
    new_habit: &NewHabit<'_>,
) -> QueryResult<Habit> {
    diesel::insert_into(habits::table)
        .values(new_habit)
        .returning(Habit::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Replaces the editable fields of a habit.
///
/// ## Errors
/// Returns an error if the habit does not exist or the database operation fails.
#[tracing::instrument(skip(conn, changes))]
pub async fn update_habit(
    conn: &mut DbConnection<'_>,
    habit_id: uuid::Uuid,
    changes: &HabitChangeset<'_>,
) -> QueryResult<Habit> {
    diesel::update(habits::table.find(habit_id))
        .set(changes)
        .returning(Habit::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Sets the active flag of a habit (archive / restore).
///
/// ## Errors
/// Returns an error if the habit does not exist or the database operation fails.
pub async fn set_active(
    conn: &mut DbConnection<'_>,
    habit_id: uuid::Uuid,
    is_active: bool,
) -> QueryResult<Habit> {
    diesel::update(habits::table.find(habit_id))
        .set((
            habits::is_active.eq(is_active),
            habits::updated_at.eq(chrono::Utc::now()),
        ))
        .returning(Habit::as_returning())
        .get_result(conn)
        .await
}
