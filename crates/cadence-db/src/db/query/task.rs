//! Query composition for `tasks`.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::tasks;
use crate::model::task::{NewTask, Task};

/// ## Summary
/// Loads the tasks shown on a day: every open task plus the tasks completed
/// during `date` (UTC), oldest first.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn load_for_day(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
    date: NaiveDate,
) -> QueryResult<Vec<Task>> {
    let day_start: DateTime<Utc> = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let next_day_start = day_start + chrono::TimeDelta::days(1);

    tasks::table
        .filter(tasks::user_id.eq(user_id))
        .filter(
            tasks::is_completed.eq(false).or(tasks::completed_at
                .ge(day_start)
                .and(tasks::completed_at.lt(next_day_start))),
        )
        .order((tasks::created_at.asc(), tasks::id.asc()))
        .select(Task::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads a task only if it belongs to `user_id`.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_owned(
    conn: &mut DbConnection<'_>,
    task_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<Task>> {
    tasks::table
        .filter(tasks::id.eq(task_id))
        .filter(tasks::user_id.eq(user_id))
        .select(Task::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts a task and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn create_task(conn: &mut DbConnection<'_>, new_task: &NewTask<'_>) -> QueryResult<Task> {
    diesel::insert_into(tasks::table)
        .values(new_task)
        .returning(Task::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Writes the completion state of a task.
///
/// ## Errors
/// Returns an error if the task does not exist or the database operation fails.
pub async fn update_completion(
    conn: &mut DbConnection<'_>,
    task_id: uuid::Uuid,
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
) -> QueryResult<Task> {
    diesel::update(tasks::table.find(task_id))
        .set((
            tasks::is_completed.eq(is_completed),
            tasks::completed_at.eq(completed_at),
            tasks::updated_at.eq(Utc::now()),
        ))
        .returning(Task::as_returning())
        .get_result(conn)
        .await
}
