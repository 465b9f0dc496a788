//! Query composition for `daily_logs`.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::daily_logs;
use crate::model::daily_log::{DailyLog, NewDailyLog};

/// ## Summary
/// Loads a user's journal entry for one date.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_for_day(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
    date: NaiveDate,
) -> QueryResult<Option<DailyLog>> {
    daily_logs::table
        .filter(daily_logs::user_id.eq(user_id))
        .filter(daily_logs::date.eq(date))
        .select(DailyLog::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts or replaces the journal entry for `(user_id, date)`.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn upsert(conn: &mut DbConnection<'_>, log: &NewDailyLog<'_>) -> QueryResult<DailyLog> {
    diesel::insert_into(daily_logs::table)
        .values(log)
        .on_conflict((daily_logs::user_id, daily_logs::date))
        .do_update()
        .set((
            daily_logs::mood_score.eq(excluded(daily_logs::mood_score)),
            daily_logs::energy_level.eq(excluded(daily_logs::energy_level)),
            daily_logs::note.eq(excluded(daily_logs::note)),
            daily_logs::updated_at.eq(chrono::Utc::now()),
        ))
        .returning(DailyLog::as_returning())
        .get_result(conn)
        .await
}
