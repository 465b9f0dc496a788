#![allow(clippy::expect_used)]
//! Integration tests for the daily journal and tasks.
//!
//! Tests:
//! - One journal entry per user and day, with score validation
//! - Task completion stamps and reopening

use cadence_test::component::db::query::daily_log;
use cadence_test::component::error::ServiceError;
use cadence_test::component::journal::service::{DailyLogRequest, upsert_daily_log};
use cadence_test::component::task::service::{create_task, set_task_completed};

use super::helpers::*;

fn entry(on: chrono::NaiveDate, mood_score: Option<i32>) -> DailyLogRequest {
    DailyLogRequest {
        date: on,
        mood_score,
        energy_level: None,
        note: None,
    }
}

/// ## Summary
/// A second entry for the same day replaces the first.
#[test_log::test(tokio::test)]
async fn daily_log_upsert() {
    let test_db = require_db!();
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let day = date(2024, 5, 1);

    let first = upsert_daily_log(&mut conn, test_db.user_id, &entry(day, Some(3)))
        .await
        .expect("Failed to write entry");
    let second = upsert_daily_log(
        &mut conn,
        test_db.user_id,
        &DailyLogRequest {
            energy_level: Some(8),
            note: Some("Better after lunch".to_string()),
            ..entry(day, Some(6))
        },
    )
    .await
    .expect("Failed to write entry");

    assert_eq!(second.id, first.id);
    let stored = daily_log::get_for_day(&mut conn, test_db.user_id, day)
        .await
        .expect("Failed to read entry")
        .expect("entry exists");
    assert_eq!(stored.mood_score, Some(6));
    assert_eq!(stored.energy_level, Some(8));
    assert_eq!(stored.note.as_deref(), Some("Better after lunch"));
}

/// ## Summary
/// Scores outside 1..=10 are rejected and nothing is stored.
#[test_log::test(tokio::test)]
async fn daily_log_score_out_of_range() {
    let test_db = require_db!();
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let day = date(2024, 5, 2);

    for score in [0, 11] {
        let request = entry(day, Some(score));
        let result = upsert_daily_log(&mut conn, test_db.user_id, &request).await;
        assert!(
            matches!(result, Err(ServiceError::ValidationError(_))),
            "{score}"
        );
    }

    let stored = daily_log::get_for_day(&mut conn, test_db.user_id, day)
        .await
        .expect("Failed to read entry");
    assert!(stored.is_none());
}

/// ## Summary
/// Completing a task stamps it once; reopening clears the stamp.
#[test_log::test(tokio::test)]
async fn task_completion_round_trip() {
    let test_db = require_db!();
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");

    let task = create_task(&mut conn, test_db.user_id, " Water the plants ")
        .await
        .expect("Failed to create task");
    assert_eq!(task.content, "Water the plants");
    assert!(!task.is_completed);

    let done = set_task_completed(&mut conn, test_db.user_id, task.id, true)
        .await
        .expect("Failed to complete task");
    let stamped = done.completed_at.expect("completion is stamped");

    let again = set_task_completed(&mut conn, test_db.user_id, task.id, true)
        .await
        .expect("Failed to complete task");
    assert_eq!(again.completed_at, Some(stamped));

    let reopened = set_task_completed(&mut conn, test_db.user_id, task.id, false)
        .await
        .expect("Failed to reopen task");
    assert!(!reopened.is_completed);
    assert!(reopened.completed_at.is_none());
}

/// ## Summary
/// Tasks need content and can only be completed by their owner.
#[test_log::test(tokio::test)]
async fn task_validation_and_ownership() {
    let test_db = require_db!();
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");

    let blank = create_task(&mut conn, test_db.user_id, "  ").await;
    assert!(matches!(blank, Err(ServiceError::ValidationError(_))));

    let other = test_db
        .seed_user("other")
        .await
        .expect("Failed to seed user");
    let task = test_db
        .seed_task(other, "Someone else's chore", None)
        .await
        .expect("Failed to seed task");
    let user_id = test_db.user_id;
    let result = set_task_completed(&mut conn, user_id, task, true).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}
