#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Connecting to the test database and applying migrations once
//! - Seeding users, habits, logs and goals
//! - Reading back stored rows
//!
//! ## Database Isolation
//! All tests share one migrated database. Each test seeds its own user, and
//! every query the services run is scoped to a user, so tests never see each
//! other's rows and can run in parallel.
//!
//! Tests are skipped when `TEST_DATABASE_URL` is not set.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tokio::sync::OnceCell;
use uuid::Uuid;

use cadence_test::component::dashboard::Dashboard;
use cadence_test::component::dashboard::service::build_dashboard;
use cadence_test::component::db::connection::{DbConnection, DbPool, create_pool};
use cadence_test::component::db::migrate::run_migrations;
use cadence_test::component::db::query::{goal, goal_progress, habit_log, user};
use cadence_test::component::db::schema::{goals, habit_logs, habits, tasks};
use cadence_test::component::habit::service::{HabitDefinition, create_habit};
use cadence_test::component::model::goal::progress::{GoalProgress, NewGoalProgress};
use cadence_test::component::model::goal::{Goal, NewGoal};
use cadence_test::component::model::habit::Habit;
use cadence_test::component::model::habit::log::{HabitLog, NewHabitLog};
use cadence_test::component::model::user::NewUser;

pub use cadence_test::component::config::TrackerConfig;
pub use cadence_test::component::db::enums::{Frequency, HabitType, LogStatus, TrackingMode};
pub use tracing;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Returns the test database URL, or `None` if integration tests are disabled.
fn database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .ok()
        .filter(|url| !url.is_empty())
}

/// Acquires a [`TestDb`] or returns from the calling test when no database is configured.
macro_rules! require_db {
    () => {
        match $crate::helpers::TestDb::new()
            .await
            .expect("Failed to set up test database")
        {
            Some(test_db) => test_db,
            None => {
                eprintln!("[TestDb] TEST_DATABASE_URL not set; skipping");
                return;
            }
        }
    };
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Noon UTC on `day`.
pub fn noon(day: NaiveDate) -> DateTime<Utc> {
    let at = day.and_hms_opt(12, 0, 0).expect("valid time");
    Utc.from_utc_datetime(&at)
}

/// Test settings with the default sweep lookback.
pub fn tracker_config() -> TrackerConfig {
    TrackerConfig::default()
}

/// A user-scoped handle on the shared test database.
pub struct TestDb {
    pool: DbPool,
    /// User seeded for this test.
    pub user_id: Uuid,
}

impl TestDb {
    /// Connects, applies migrations on first use and seeds a fresh user.
    ///
    /// ## Errors
    /// Returns an error if the database is unreachable or seeding fails.
    pub async fn new() -> anyhow::Result<Option<Self>> {
        let Some(url) = database_url() else {
            return Ok(None);
        };

        MIGRATED
            .get_or_try_init(|| async {
                let applied = run_migrations(&url).await?;
                eprintln!("[TestDb] Applied {applied} migrations");
                anyhow::Ok(())
            })
            .await?;

        let pool = create_pool(&url, 4).await?;
        let mut test_db = Self {
            pool,
            user_id: Uuid::nil(),
        };
        test_db.user_id = test_db.seed_user("primary").await?;

        Ok(Some(test_db))
    }

    /// ## Errors
    /// Returns an error if no connection can be checked out.
    pub async fn get_conn(&self) -> anyhow::Result<DbConnection<'_>> {
        Ok(self.pool.get().await?)
    }

    /// Seeds a user with a unique email and returns its id.
    ///
    /// ## Errors
    /// Returns an error if the insert fails.
    pub async fn seed_user(&self, name: &str) -> anyhow::Result<Uuid> {
        let mut conn = self.get_conn().await?;
        let email = format!("{name}-{}@cadence.test", Uuid::new_v4());
        let new_user = NewUser {
            name,
            email: &email,
        };
        let created = user::create_user(&mut conn, &new_user).await?;
        Ok(created.id)
    }

    /// Creates a habit through the service and backdates it to `created`.
    ///
    /// ## Errors
    /// Returns an error if validation or the insert fails.
    pub async fn seed_habit(
        &self,
        user_id: Uuid,
        frequency: Frequency,
        frequency_config: Value,
        created: NaiveDate,
    ) -> anyhow::Result<Habit> {
        let mut conn = self.get_conn().await?;
        let habit = create_habit(
            &mut conn,
            user_id,
            &HabitDefinition {
                name: format!("{frequency} habit"),
                description: None,
                habit_type: HabitType::Build,
                frequency,
                frequency_config,
                tracking_mode: TrackingMode::Binary,
                config: Value::Null,
                linked_goal_id: None,
            },
        )
        .await?;

        self.backdate_habit(habit.id, created).await
    }

    /// Stores a habit row as-is, bypassing validation.
    ///
    /// ## Errors
    /// Returns an error if the insert fails.
    pub async fn seed_raw_habit(
        &self,
        user_id: Uuid,
        frequency: Frequency,
        frequency_config: Value,
        created: NaiveDate,
    ) -> anyhow::Result<Habit> {
        let mut conn = self.get_conn().await?;
        let id: Uuid = diesel::insert_into(habits::table)
            .values((
                habits::user_id.eq(user_id),
                habits::name.eq("raw habit"),
                habits::habit_type.eq(HabitType::Build),
                habits::frequency.eq(frequency),
                habits::frequency_config.eq(frequency_config),
                habits::tracking_mode.eq(TrackingMode::Binary),
                habits::config.eq(serde_json::json!({})),
            ))
            .returning(habits::id)
            .get_result(&mut conn)
            .await?;
        drop(conn);

        self.backdate_habit(id, created).await
    }

    /// Moves a habit's creation time to noon UTC on `created`.
    ///
    /// ## Errors
    /// Returns an error if the update fails.
    pub async fn backdate_habit(
        &self,
        habit_id: Uuid,
        created: NaiveDate,
    ) -> anyhow::Result<Habit> {
        let mut conn = self.get_conn().await?;
        let created_at = noon(created);
        let habit = diesel::update(habits::table.find(habit_id))
            .set((
                habits::created_at.eq(created_at),
                habits::updated_at.eq(created_at),
            ))
            .returning(Habit::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(habit)
    }

    /// ## Errors
    /// Returns an error if the insert fails.
    pub async fn seed_log(
        &self,
        habit_id: Uuid,
        on: NaiveDate,
        status: LogStatus,
    ) -> anyhow::Result<HabitLog> {
        let mut conn = self.get_conn().await?;
        Ok(habit_log::upsert(
            &mut conn,
            &NewHabitLog {
                habit_id,
                date: on,
                status,
                entry_value: None,
                note: None,
            },
        )
        .await?)
    }

    /// All logs of a habit, oldest first.
    ///
    /// ## Errors
    /// Returns an error if the query fails.
    pub async fn logs_of(&self, habit_id: Uuid) -> anyhow::Result<Vec<HabitLog>> {
        let mut conn = self.get_conn().await?;
        Ok(habit_logs::table
            .filter(habit_logs::habit_id.eq(habit_id))
            .order(habit_logs::date.asc())
            .select(HabitLog::as_select())
            .load(&mut conn)
            .await?)
    }

    /// Number of habits stored for a user, archived ones included.
    ///
    /// ## Errors
    /// Returns an error if the query fails.
    pub async fn habit_count(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let mut conn = self.get_conn().await?;
        Ok(habits::table
            .filter(habits::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)
            .await?)
    }

    /// ## Errors
    /// Returns an error if the insert fails.
    pub async fn seed_goal(&self, user_id: Uuid, name: &str) -> anyhow::Result<Goal> {
        let mut conn = self.get_conn().await?;
        Ok(goal::create_goal(
            &mut conn,
            &NewGoal {
                user_id,
                name,
                category: "General",
            },
        )
        .await?)
    }

    /// Records forward progress on a goal for `on`.
    ///
    /// ## Errors
    /// Returns an error if the upsert fails.
    pub async fn seed_progress(
        &self,
        goal_id: Uuid,
        on: NaiveDate,
        note: &str,
    ) -> anyhow::Result<GoalProgress> {
        let mut conn = self.get_conn().await?;
        Ok(goal_progress::upsert(
            &mut conn,
            &NewGoalProgress {
                goal_id,
                date: on,
                moved_forward: true,
                note: Some(note),
                source_habit_id: None,
            },
        )
        .await?)
    }

    /// Links an existing habit to a goal.
    ///
    /// ## Errors
    /// Returns an error if the update fails.
    pub async fn link_habit(&self, habit_id: Uuid, goal_id: Uuid) -> anyhow::Result<()> {
        let mut conn = self.get_conn().await?;
        diesel::update(habits::table.find(habit_id))
            .set(habits::linked_goal_id.eq(goal_id))
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    /// Marks a goal completed directly in storage.
    ///
    /// ## Errors
    /// Returns an error if the update fails.
    pub async fn complete_goal(&self, goal_id: Uuid) -> anyhow::Result<()> {
        let mut conn = self.get_conn().await?;
        diesel::update(goals::table.find(goal_id))
            .set((
                goals::is_completed.eq(true),
                goals::completed_at.eq(Some(Utc::now())),
            ))
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    /// Builds the primary user's dashboard for `date`.
    ///
    /// ## Errors
    /// Returns an error if the dashboard cannot be assembled.
    pub async fn dashboard(&self, date: NaiveDate, today: NaiveDate) -> anyhow::Result<Dashboard> {
        let mut conn = self.get_conn().await?;
        let config = tracker_config();
        let dashboard = build_dashboard(&mut conn, &config, self.user_id, date, today)
            .await?;
        Ok(dashboard)
    }

    /// Seeds a task, optionally completed at noon UTC on `completed_on`.
    ///
    /// ## Errors
    /// Returns an error if the insert fails.
    pub async fn seed_task(
        &self,
        user_id: Uuid,
        content: &str,
        completed_on: Option<NaiveDate>,
    ) -> anyhow::Result<Uuid> {
        let mut conn = self.get_conn().await?;
        let completed_at = completed_on.map(noon);
        Ok(diesel::insert_into(tasks::table)
            .values((
                tasks::user_id.eq(user_id),
                tasks::content.eq(content),
                tasks::is_completed.eq(completed_at.is_some()),
                tasks::completed_at.eq(completed_at),
            ))
            .returning(tasks::id)
            .get_result(&mut conn)
            .await?)
    }
}
