//! Row builders for evaluator unit tests.

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use cadence_db::db::enums::{Frequency, HabitType, LogStatus, TrackingMode};
use cadence_db::model::habit::{Habit, log::HabitLog};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A habit created at noon UTC on `created`.
pub fn habit(frequency: Frequency, frequency_config: Value, created: NaiveDate) -> Habit {
    let noon = created.and_hms_opt(12, 0, 0).expect("valid time");
    let created_at = Utc.from_utc_datetime(&noon);
    Habit {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        name: format!("{frequency} habit"),
        description: None,
        habit_type: HabitType::Build,
        frequency,
        frequency_config,
        tracking_mode: TrackingMode::Binary,
        config: json!({}),
        linked_goal_id: None,
        is_active: true,
        created_at,
        updated_at: created_at,
    }
}

pub fn daily(created: NaiveDate) -> Habit {
    habit(Frequency::Daily, json!({}), created)
}

pub fn weekly(days: &[&str], created: NaiveDate) -> Habit {
    habit(Frequency::Weekly, json!({ "days": days }), created)
}

pub fn windowed(target: u32, period: u32, created: NaiveDate) -> Habit {
    habit(
        Frequency::Windowed,
        json!({ "target": target, "period": period }),
        created,
    )
}

pub fn log(habit_id: Uuid, on: NaiveDate, status: LogStatus) -> HabitLog {
    let at = Utc.from_utc_datetime(&on.and_hms_opt(20, 0, 0).expect("valid time"));
    HabitLog {
        id: Uuid::new_v4(),
        habit_id,
        date: on,
        status,
        entry_value: None,
        note: None,
        created_at: at,
        updated_at: at,
    }
}
