//! Query composition for `habit_logs`.
//!
//! Logs are always fetched in bulk for a set of habits so that callers can
//! index them in memory instead of issuing one query per habit.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::habit_logs;
use crate::model::habit::log::{HabitLog, NewHabitLog};

/// ## Summary
/// Returns a query for the logs of several habits, ordered by habit and date.
#[must_use]
pub fn for_habits(habit_ids: Vec<uuid::Uuid>) -> habit_logs::BoxedQuery<'static, diesel::pg::Pg> {
    habit_logs::table
        .filter(habit_logs::habit_id.eq_any(habit_ids))
        .order((habit_logs::habit_id.asc(), habit_logs::date.asc()))
        .into_boxed()
}

/// ## Summary
/// Loads all logs of the given habits dated within `[start, end]`.
///
/// ## Errors
/// Returns an error if the database operation fails.
#[tracing::instrument(skip(conn, habit_ids), fields(habit_count = habit_ids.len()))]
pub async fn load_between(
    conn: &mut DbConnection<'_>,
    habit_ids: &[uuid::Uuid],
    start: NaiveDate,
    end: NaiveDate,
) -> QueryResult<Vec<HabitLog>> {
    if habit_ids.is_empty() {
        return Ok(Vec::new());
    }

    for_habits(habit_ids.to_vec())
        .filter(habit_logs::date.between(start, end))
        .select(HabitLog::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads all logs of the given habits dated on or before `end`.
///
/// ## Errors
/// Returns an error if the database operation fails.
#[tracing::instrument(skip(conn, habit_ids), fields(habit_count = habit_ids.len()))]
pub async fn load_until(
    conn: &mut DbConnection<'_>,
    habit_ids: &[uuid::Uuid],
    end: NaiveDate,
) -> QueryResult<Vec<HabitLog>> {
    if habit_ids.is_empty() {
        return Ok(Vec::new());
    }

    for_habits(habit_ids.to_vec())
        .filter(habit_logs::date.le(end))
        .select(HabitLog::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads the full log history of the given habits.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn load_all(
    conn: &mut DbConnection<'_>,
    habit_ids: &[uuid::Uuid],
) -> QueryResult<Vec<HabitLog>> {
    if habit_ids.is_empty() {
        return Ok(Vec::new());
    }

    for_habits(habit_ids.to_vec())
        .select(HabitLog::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Inserts or updates the log for `(habit_id, date)`.
///
/// An existing log for the same day has its status, value and note replaced.
///
/// ## Errors
/// Returns an error if the database operation fails.
#[tracing::instrument(
    skip(conn, log),
    fields(habit_id = %log.habit_id, date = %log.date, status = %log.status)
)]
pub async fn upsert(conn: &mut DbConnection<'_>, log: &NewHabitLog<'_>) -> QueryResult<HabitLog> {
    diesel::insert_into(habit_logs::table)
        .values(log)
        .on_conflict((habit_logs::habit_id, habit_logs::date))
        .do_update()
        .set((
            habit_logs::status.eq(excluded(habit_logs::status)),
            habit_logs::entry_value.eq(excluded(habit_logs::entry_value)),
            habit_logs::note.eq(excluded(habit_logs::note)),
            habit_logs::updated_at.eq(chrono::Utc::now()),
        ))
        .returning(HabitLog::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Inserts a log unless one already exists for `(habit_id, date)`.
///
/// ## Returns
/// `true` if a row was written, `false` if the unique constraint turned the
/// insert into a no-op.
///
/// ## Errors
/// Returns an error if the database operation fails.
#[tracing::instrument(
    skip(conn, log),
    fields(habit_id = %log.habit_id, date = %log.date, status = %log.status)
)]
pub async fn insert_if_absent(
    conn: &mut DbConnection<'_>,
    log: &NewHabitLog<'_>,
) -> QueryResult<bool> {
    let inserted = diesel::insert_into(habit_logs::table)
        .values(log)
        .on_conflict((habit_logs::habit_id, habit_logs::date))
        .do_nothing()
        .execute(conn)
        .await?;

    Ok(inserted > 0)
}
