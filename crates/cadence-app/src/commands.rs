//! Execution of parsed CLI commands.

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use cadence_core::config::Settings;
use cadence_db::db::DbProvider;
use cadence_db::db::connection::{DbPool, create_pool};
use cadence_db::db::migrate::run_migrations;
use cadence_service::dashboard::service::build_dashboard;
use cadence_service::goal::insight::load_insight_context;
use cadence_service::habit::service::load_habit_stats;
use cadence_service::habit::sweep::close_expired_windows;

use crate::cli::Command;

fn today_or_now(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Utc::now().date_naive())
}

async fn connect(settings: &Settings) -> anyhow::Result<DbPool> {
    create_pool(
        &settings.database.url,
        u32::from(settings.database.max_connections),
    )
    .await
}

/// ## Summary
/// Runs one command and returns its JSON output.
///
/// ## Errors
/// Returns an error if the database is unreachable or the command fails.
pub async fn run(command: Command, settings: &Settings) -> anyhow::Result<Value> {
    let output = match command {
        Command::Migrate => {
            let applied = run_migrations(&settings.database.url).await?;
            serde_json::json!({ "applied": applied })
        }
        Command::Dashboard { user, date, today } => {
            let pool = connect(settings).await?;
            let mut conn = pool.get_connection().await?;
            let today = today_or_now(today);
            let dashboard = build_dashboard(&mut conn, &settings.tracker, user, date, today)
                .await?;
            serde_json::to_value(dashboard)?
        }
        Command::Sweep { user, today } => {
            let pool = connect(settings).await?;
            let mut conn = pool.get_connection().await?;
            let today = today_or_now(today);
            let report = close_expired_windows(&mut conn, user, today).await?;
            serde_json::to_value(report)?
        }
        Command::Stats { user, habit, today } => {
            let pool = connect(settings).await?;
            let mut conn = pool.get_connection().await?;
            let today = today_or_now(today);
            let stats = load_habit_stats(&mut conn, user, habit, today).await?;
            serde_json::to_value(stats)?
        }
        Command::Insight { user, goal } => {
            let pool = connect(settings).await?;
            let mut conn = pool.get_connection().await?;
            serde_json::to_value(load_insight_context(&mut conn, user, goal).await?)?
        }
    };

    Ok(output)
}
