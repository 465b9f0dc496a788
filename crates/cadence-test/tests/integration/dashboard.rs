#![allow(clippy::expect_used)]
//! Integration tests for dashboard assembly.
//!
//! Tests:
//! - Weekly and windowed visibility over stored logs
//! - The sweep gate for current versus history dates
//! - Goals with their progress history, linked goal names, tasks and the
//!   journal entry of the day

use serde_json::json;

use cadence_test::component::dashboard::service::build_dashboard;
use cadence_test::component::error::ServiceError;
use cadence_test::component::journal::service::{DailyLogRequest, upsert_daily_log};

use super::helpers::*;

/// ## Summary
/// Weekly habits appear on their configured weekdays only.
#[test_log::test(tokio::test)]
async fn weekly_habit_on_configured_days() {
    let test_db = require_db!();
    let habit = test_db
        .seed_habit(
            test_db.user_id,
            Frequency::Weekly,
            json!({"days": ["MON", "WED"]}),
            date(2023, 12, 1),
        )
        .await
        .expect("Failed to seed habit");

    let today = date(2024, 1, 3);
    let monday = test_db
        .dashboard(date(2024, 1, 1), today)
        .await
        .expect("Dashboard failed");
    let tuesday = test_db
        .dashboard(date(2024, 1, 2), today)
        .await
        .expect("Dashboard failed");

    assert_eq!(monday.habits.len(), 1);
    assert_eq!(monday.habits[0].habit.id, habit.id);
    assert!(tuesday.habits.is_empty());
}

/// ## Summary
/// A windowed habit disappears once its quota is met, except on the days
/// that carry a success.
#[test_log::test(tokio::test)]
async fn windowed_habit_hidden_after_quota() {
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
    for day in [2, 4] {
        test_db
            .seed_log(habit.id, date(2024, 1, day), LogStatus::Done)
            .await
            .expect("Failed to seed log");
    }

    let today = date(2024, 1, 5);
    let quiet_day = test_db
        .dashboard(today, today)
        .await
        .expect("Dashboard failed");
    assert!(quiet_day.habits.is_empty());

    let logged_day = test_db
        .dashboard(date(2024, 1, 4), today)
        .await
        .expect("Dashboard failed");
    assert_eq!(logged_day.habits.len(), 1);

    let view = &logged_day.habits[0];
    let status = view.today_log.as_ref().map(|log| log.status);
    assert_eq!(status, Some(LogStatus::Done));
    let progress = view
        .window_progress
        .expect("windowed habits carry progress");
    assert_eq!(progress.current, 2);
    assert!(progress.is_satisfied);
}

/// ## Summary
/// Current dates close expired windows before reading; history dates never write.
#[test_log::test(tokio::test)]
async fn sweep_runs_only_for_current_dates() {
    let test_db = require_db!();
    let habit = test_db
        .seed_habit(
            test_db.user_id,
            Frequency::Windowed,
            json!({"target": 1, "period": 7}),
            date(2024, 1, 1),
        )
        .await
        .expect("Failed to seed habit");

    let today = date(2024, 1, 10);
    let history = test_db
        .dashboard(date(2024, 1, 3), today)
        .await
        .expect("Dashboard failed");
    assert!(history.sweep.is_none());
    let logs = test_db
        .logs_of(habit.id)
        .await
        .expect("Failed to load logs");
    assert!(logs.is_empty());

    let yesterday = test_db
        .dashboard(date(2024, 1, 9), today)
        .await
        .expect("Dashboard failed");
    let inserted = yesterday.sweep.map(|report| report.failed_inserted);
    assert_eq!(inserted, Some(1));

    let logs = test_db
        .logs_of(habit.id)
        .await
        .expect("Failed to load logs");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, LogStatus::Failed);
    assert_eq!(logs[0].date, date(2024, 1, 7));
}

/// ## Summary
/// Goals carry the progress of the viewed date and their full history, newest
/// first. Habits name the goal they feed. Tasks include open ones and those
/// completed that day, and the journal entry is attached.
#[test_log::test(tokio::test)]
async fn goals_tasks_and_journal() {
    let test_db = require_db!();
    let day = date(2024, 3, 5);

    let open_goal = test_db
        .seed_goal(test_db.user_id, "Write a book")
        .await
        .expect("Failed to seed goal");
    let done_goal = test_db
        .seed_goal(test_db.user_id, "Move house")
        .await
        .expect("Failed to seed goal");
    test_db
        .complete_goal(done_goal.id)
        .await
        .expect("Failed to complete goal");

    let writing = test_db
        .seed_habit(
            test_db.user_id,
            Frequency::Daily,
            json!({}),
            date(2024, 3, 1),
        )
        .await
        .expect("Failed to seed habit");
    test_db
        .link_habit(writing.id, open_goal.id)
        .await
        .expect("Failed to link habit");

    let open_task = test_db
        .seed_task(test_db.user_id, "Call the bank", None)
        .await
        .expect("Failed to seed task");
    let done_today = test_db
        .seed_task(test_db.user_id, "Buy stamps", Some(day))
        .await
        .expect("Failed to seed task");
    test_db
        .seed_task(test_db.user_id, "Renew passport", Some(date(2024, 3, 1)))
        .await
        .expect("Failed to seed task");

    for (on, note) in [(date(2024, 3, 2), "Outline"), (day, "Chapter two")] {
        test_db
            .seed_progress(open_goal.id, on, note)
            .await
            .expect("Failed to seed progress");
    }

    let mut conn = test_db.get_conn().await.expect("Failed to get connection");
    upsert_daily_log(
        &mut conn,
        test_db.user_id,
        &DailyLogRequest {
            date: day,
            mood_score: Some(7),
            energy_level: Some(4),
            note: None,
        },
    )
    .await
    .expect("Failed to write journal");

    let dashboard = test_db.dashboard(day, day).await.expect("Dashboard failed");

    assert_eq!(dashboard.goals.len(), 1);
    let goal_view = &dashboard.goals[0];
    assert_eq!(goal_view.goal.id, open_goal.id);
    let today_note = goal_view
        .today_progress
        .as_ref()
        .and_then(|progress| progress.note.as_deref());
    assert_eq!(today_note, Some("Chapter two"));
    let history: Vec<_> = goal_view.logs.iter().map(|entry| entry.date).collect();
    assert_eq!(history, [day, date(2024, 3, 2)]);

    assert_eq!(dashboard.habits.len(), 1);
    assert_eq!(dashboard.habits[0].habit.id, writing.id);
    let goal_name = dashboard.habits[0].linked_goal_name.as_deref();
    assert_eq!(goal_name, Some("Write a book"));

    let task_ids: Vec<_> = dashboard.tasks.iter().map(|task| task.id).collect();
    assert_eq!(task_ids, [open_task, done_today]);

    let mood = dashboard.daily_log.as_ref().and_then(|log| log.mood_score);
    assert_eq!(mood, Some(7));
}

/// ## Summary
/// An unknown user is reported as not found.
#[test_log::test(tokio::test)]
async fn unknown_user_not_found() {
    let test_db = require_db!();
    let mut conn = test_db.get_conn().await.expect("Failed to get connection");

    let result = build_dashboard(
        &mut conn,
        &tracker_config(),
        uuid::Uuid::new_v4(),
        date(2024, 1, 1),
        date(2024, 1, 1),
    )
    .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}
