use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::{enums::LogStatus, schema};

/// One outcome for a habit on one calendar date. Unique per `(habit_id, date)`.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = schema::habit_logs)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(super::Habit, foreign_key = habit_id))]
pub struct HabitLog {
    pub id: uuid::Uuid,
    pub habit_id: uuid::Uuid,
    pub date: chrono::NaiveDate,
    pub status: LogStatus,
    pub entry_value: Option<serde_json::Value>,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl HabitLog {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Insert struct for creating new habit logs
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::habit_logs)]
pub struct NewHabitLog<'a> {
    pub habit_id: uuid::Uuid,
    pub date: chrono::NaiveDate,
    pub status: LogStatus,
    pub entry_value: Option<&'a serde_json::Value>,
    pub note: Option<&'a str>,
}
