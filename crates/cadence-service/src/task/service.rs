use chrono::Utc;
use uuid::Uuid;

use cadence_db::db::connection::DbConnection;
use cadence_db::db::query::task;
use cadence_db::model::task::{NewTask, Task};

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Creates an open task.
///
/// ## Errors
/// Returns `ServiceError::ValidationError` if the content is blank, or a database error.
#[tracing::instrument(skip(conn, content))]
pub async fn create_task(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    content: &str,
) -> ServiceResult<Task> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ServiceError::ValidationError(
            "task content must not be empty".to_string(),
        ));
    }

    let new_task = NewTask { user_id, content };
    Ok(task::create_task(conn, &new_task).await?)
}

/// ## Summary
/// Completes or reopens a task, stamping or clearing `completed_at`.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the task is not the user's, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn set_task_completed(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    task_id: Uuid,
    is_completed: bool,
) -> ServiceResult<Task> {
    let current = task::get_owned(conn, task_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("task {task_id}")))?;

    let completed_at = if is_completed {
        current.completed_at.or_else(|| Some(Utc::now()))
    } else {
        None
    };

    let updated = task::update_completion(conn, task_id, is_completed, completed_at)
        .await?;
    Ok(updated)
}
