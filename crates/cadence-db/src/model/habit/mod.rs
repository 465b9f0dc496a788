use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::{
    enums::{Frequency, HabitType, TrackingMode},
    schema,
};

pub mod log;

/// A user-defined habit with its recurrence configuration.
///
/// `frequency_config` holds `{"days": [...]}` for weekly habits and
/// `{"target": n, "period": m}` for windowed ones.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = schema::habits)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(crate::model::user::User, foreign_key = user_id))]
pub struct Habit {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub habit_type: HabitType,
    pub frequency: Frequency,
    pub frequency_config: serde_json::Value,
    pub tracking_mode: TrackingMode,
    pub config: serde_json::Value,
    pub linked_goal_id: Option<uuid::Uuid>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Habit {
    /// Calendar date (UTC) the habit was created; anchors windowed periods.
    #[must_use]
    pub fn anchor_date(&self) -> chrono::NaiveDate {
        self.created_at.date_naive()
    }
}

/// Insert struct for creating new habits
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::habits)]
pub struct NewHabit<'a> {
    pub user_id: uuid::Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub habit_type: HabitType,
    pub frequency: Frequency,
    pub frequency_config: &'a serde_json::Value,
    pub tracking_mode: TrackingMode,
    pub config: &'a serde_json::Value,
    pub linked_goal_id: Option<uuid::Uuid>,
}

/// Full replacement of the user-editable habit fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::habits)]
#[diesel(treat_none_as_null = true)]
pub struct HabitChangeset<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub habit_type: HabitType,
    pub frequency: Frequency,
    pub frequency_config: &'a serde_json::Value,
    pub tracking_mode: TrackingMode,
    pub config: &'a serde_json::Value,
    pub linked_goal_id: Option<uuid::Uuid>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
