#![allow(clippy::expect_used)]
//! Integration tests for the auto-fail sweep.
//!
//! Tests:
//! - Closing an expired window with a `FAILED` log
//! - Idempotence across repeated and concurrent runs
//! - Per-habit isolation of invalid rules

use serde_json::json;

use cadence_test::component::habit::sweep::close_expired_windows;

use super::helpers::*;

/// ## Summary
/// A window that missed its target gets exactly one `FAILED` log on its last
/// day, and later sweeps add nothing.
#[test_log::test(tokio::test)]
async fn missed_window_closed_once() {
    let test_db = require_db!();
    let habit = test_db
        .seed_habit(
            test_db.user_id,
            Frequency::Windowed,
            json!({"target": 2, "period": 7}),
            date(2024, 1, 1),
        )
        .await
        .expect("Failed to seed habit");
    test_db
        .seed_log(habit.id, date(2024, 1, 2), LogStatus::Done)
        .await
        .expect("Failed to seed log");
    test_db
        .seed_log(habit.id, date(2024, 1, 3), LogStatus::Missed)
        .await
        .expect("Failed to seed log");

    let mut conn = test_db.get_conn().await.expect("Failed to get connection");

    let first = close_expired_windows(&mut conn, test_db.user_id, date(2024, 1, 10))
        .await
        .expect("Sweep failed");
    assert_eq!(first.habits_examined, 1);
    assert_eq!(first.failed_inserted, 1);

    let again = close_expired_windows(&mut conn, test_db.user_id, date(2024, 1, 10))
        .await
        .expect("Sweep failed");
    assert_eq!(again.failed_inserted, 0);

    let next_day = close_expired_windows(&mut conn, test_db.user_id, date(2024, 1, 11))
        .await
        .expect("Sweep failed");
    assert_eq!(next_day.failed_inserted, 0);

    let failed: Vec<_> = test_db
        .logs_of(habit.id)
        .await
        .expect("Failed to load logs")
        .into_iter()
        .filter(|log| log.status == LogStatus::Failed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].date, date(2024, 1, 7));
    assert_eq!(failed[0].note.as_deref(), Some("1/2"));
}

/// ## Summary
/// Two sweeps racing on separate connections write a single `FAILED` log.
#[test_log::test(tokio::test)]
async fn concurrent_sweeps_insert_once() {
    let test_db = require_db!();
    let habit = test_db
        .seed_habit(
            test_db.user_id,
            Frequency::Windowed,
            json!({"target": 1, "period": 3}),
            date(2024, 1, 1),
        )
        .await
        .expect("Failed to seed habit");

    let mut left = test_db.get_conn().await.expect("Failed to get connection");
    let mut right = test_db.get_conn().await.expect("Failed to get connection");

    let (a, b) = tokio::join!(
        close_expired_windows(&mut left, test_db.user_id, date(2024, 1, 4)),
        close_expired_windows(&mut right, test_db.user_id, date(2024, 1, 4)),
    );
    let a = a.expect("Sweep failed");
    let b = b.expect("Sweep failed");

    assert_eq!(a.failed_inserted + b.failed_inserted, 1);

    let logs = test_db
        .logs_of(habit.id)
        .await
        .expect("Failed to load logs");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].date, date(2024, 1, 3));
    assert_eq!(logs[0].note.as_deref(), Some("0/1"));
}

/// ## Summary
/// A user's own log on a window's last day is never replaced by the sweep.
#[test_log::test(tokio::test)]
async fn existing_log_on_window_end_wins() {
    let test_db = require_db!();
    let habit = test_db
        .seed_habit(
            test_db.user_id,
            Frequency::Windowed,
            json!({"target": 3, "period": 7}),
            date(2024, 1, 1),
        )
        .await
        .expect("Failed to seed habit");
    test_db
        .seed_log(habit.id, date(2024, 1, 7), LogStatus::Partial)
        .await
        .expect("Failed to seed log");

    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let report = close_expired_windows(&mut conn, test_db.user_id, date(2024, 1, 9))
        .await
        .expect("Sweep failed");

    assert_eq!(report.failed_inserted, 0);
    assert_eq!(report.conflicts, 1);

    let logs = test_db
        .logs_of(habit.id)
        .await
        .expect("Failed to load logs");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, LogStatus::Partial);
}

/// ## Summary
/// A habit with a broken rule is skipped without stopping the others, and
/// archived or non-windowed habits are never examined.
#[test_log::test(tokio::test)]
async fn invalid_rule_isolated() {
    let test_db = require_db!();
    let broken = test_db
        .seed_raw_habit(
            test_db.user_id,
            Frequency::Windowed,
            json!({"target": "many"}),
            date(2024, 1, 1),
        )
        .await
        .expect("Failed to seed habit");
    let healthy = test_db
        .seed_habit(
            test_db.user_id,
            Frequency::Windowed,
            json!({"target": 1, "period": 2}),
            date(2024, 1, 1),
        )
        .await
        .expect("Failed to seed habit");
    test_db
        .seed_habit(
            test_db.user_id,
            Frequency::Daily,
            json!({}),
            date(2024, 1, 1),
        )
        .await
        .expect("Failed to seed habit");

    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let report = close_expired_windows(&mut conn, test_db.user_id, date(2024, 1, 5))
        .await
        .expect("Sweep failed");

    assert_eq!(report.habits_examined, 2);
    assert_eq!(report.habits_skipped, 1);
    assert_eq!(report.failed_inserted, 2);
    let broken_logs = test_db
        .logs_of(broken.id)
        .await
        .expect("Failed to load logs");
    assert!(broken_logs.is_empty());
    let healthy_logs = test_db
        .logs_of(healthy.id)
        .await
        .expect("Failed to load logs");
    assert_eq!(healthy_logs.len(), 2);
}

/// ## Summary
/// Sweeping one user never touches another user's habits.
#[test_log::test(tokio::test)]
async fn sweep_scoped_to_user() {
    let test_db = require_db!();
    let other_user = test_db
        .seed_user("other")
        .await
        .expect("Failed to seed user");
    let others = test_db
        .seed_habit(
            other_user,
            Frequency::Windowed,
            json!({"target": 1, "period": 2}),
            date(2024, 1, 1),
        )
        .await
        .expect("Failed to seed habit");

    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    let report = close_expired_windows(&mut conn, test_db.user_id, date(2024, 2, 1))
        .await
        .expect("Sweep failed");

    assert_eq!(report.habits_examined, 0);
    let logs = test_db
        .logs_of(others.id)
        .await
        .expect("Failed to load logs");
    assert!(logs.is_empty());
}
