//! Habit definition, logging and statistics services.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use cadence_db::db::connection::DbConnection;
use cadence_db::db::enums::{Frequency, HabitType, LogStatus, TrackingMode};
use cadence_db::db::query::{goal, habit, habit_log};
use cadence_db::model::habit::{Habit, HabitChangeset, NewHabit, log::HabitLog, log::NewHabitLog};

use super::recurrence::{validate_definition, validate_entry_value};
use super::stats::{HabitStats, habit_stats};
use crate::error::{ServiceError, ServiceResult};

/// User-editable fields of a habit.
#[derive(Debug, Clone, Deserialize)]
pub struct HabitDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_habit_type")]
    pub habit_type: HabitType,
    pub frequency: Frequency,
    #[serde(default)]
    pub frequency_config: Value,
    #[serde(default = "default_tracking_mode")]
    pub tracking_mode: TrackingMode,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub linked_goal_id: Option<Uuid>,
}

const fn default_habit_type() -> HabitType {
    HabitType::Build
}

const fn default_tracking_mode() -> TrackingMode {
    TrackingMode::Binary
}

/// A definition that passed validation, with its canonical frequency config.
struct ValidDefinition<'a> {
    name: &'a str,
    frequency_config: Value,
    config: Value,
}

impl HabitDefinition {
    fn validate(&self) -> ServiceResult<ValidDefinition<'_>> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "habit name must not be empty".to_string(),
            ));
        }

        let recurrence = validate_definition(
            self.habit_type,
            self.tracking_mode,
            self.frequency,
            &self.frequency_config,
        )
        .map_err(|err| ServiceError::ValidationError(err.to_string()))?;

        let config = if self.config.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            self.config.clone()
        };

        Ok(ValidDefinition {
            name,
            frequency_config: recurrence.to_config(),
            config,
        })
    }
}

async fn ensure_goal_owned(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    goal_id: Option<Uuid>,
) -> ServiceResult<()> {
    if let Some(goal_id) = goal_id
        && goal::get_owned(conn, goal_id, user_id).await?.is_none()
    {
        return Err(ServiceError::NotFound(format!("goal {goal_id}")));
    }
    Ok(())
}

/// ## Summary
/// Loads a habit that must belong to `user_id`.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the habit does not exist or belongs to
/// someone else.
pub async fn get_owned_habit(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    habit_id: Uuid,
) -> ServiceResult<Habit> {
    habit::get_owned(conn, habit_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("habit {habit_id}")))
}

/// ## Summary
/// Validates and stores a new habit.
///
/// The frequency configuration is stored in canonical form.
///
/// ## Errors
/// Returns `ServiceError::ValidationError` for an invalid definition (nothing
/// is written), `ServiceError::NotFound` if the linked goal is not the user's,
/// or a database error.
#[tracing::instrument(skip(conn, definition), fields(frequency = %definition.frequency))]
pub async fn create_habit(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    definition: &HabitDefinition,
) -> ServiceResult<Habit> {
    let valid = definition.validate()?;
    let linked_goal_id = definition.linked_goal_id;
    ensure_goal_owned(conn, user_id, linked_goal_id).await?;

    let created = habit::create_habit(
        conn,
        &NewHabit {
            user_id,
            name: valid.name,
            description: definition.description.as_deref(),
            habit_type: definition.habit_type,
            frequency: definition.frequency,
            frequency_config: &valid.frequency_config,
            tracking_mode: definition.tracking_mode,
            config: &valid.config,
            linked_goal_id,
        },
    )
    .await?;

    tracing::info!(habit_id = %created.id, "Habit created");

    Ok(created)
}

/// ## Summary
/// Replaces the definition of an existing habit.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the habit or linked goal is not the
/// user's, `ServiceError::ValidationError` for an invalid definition, or a
/// database error.
#[tracing::instrument(skip(conn, definition), fields(frequency = %definition.frequency))]
pub async fn update_habit(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    habit_id: Uuid,
    definition: &HabitDefinition,
) -> ServiceResult<Habit> {
    let valid = definition.validate()?;
    get_owned_habit(conn, user_id, habit_id).await?;
    let linked_goal_id = definition.linked_goal_id;
    ensure_goal_owned(conn, user_id, linked_goal_id).await?;

    let updated = habit::update_habit(
        conn,
        habit_id,
        &HabitChangeset {
            name: valid.name,
            description: definition.description.as_deref(),
            habit_type: definition.habit_type,
            frequency: definition.frequency,
            frequency_config: &valid.frequency_config,
            tracking_mode: definition.tracking_mode,
            config: &valid.config,
            linked_goal_id,
            updated_at: chrono::Utc::now(),
        },
    )
    .await?;

    Ok(updated)
}

/// ## Summary
/// Archives (`false`) or restores (`true`) a habit.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the habit is not the user's, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn set_habit_active(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    habit_id: Uuid,
    is_active: bool,
) -> ServiceResult<Habit> {
    get_owned_habit(conn, user_id, habit_id).await?;
    Ok(habit::set_active(conn, habit_id, is_active).await?)
}

/// A user's outcome for one habit on one day.
#[derive(Debug, Clone, Deserialize)]
pub struct LogHabitRequest {
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub status: LogStatus,
    #[serde(default)]
    pub entry_value: Option<Value>,
    #[serde(default)]
    pub note: Option<String>,
}

/// ## Summary
/// Records the outcome of a habit for a day, replacing any earlier log for
/// that day.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the habit is not the user's,
/// `ServiceError::ValidationError` if the entry value does not fit the
/// habit's tracking mode, or a database error.
#[tracing::instrument(
    skip(conn, request),
    fields(habit_id = %request.habit_id, date = %request.date, status = %request.status)
)]
pub async fn log_habit(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    request: &LogHabitRequest,
) -> ServiceResult<HabitLog> {
    let habit = get_owned_habit(conn, user_id, request.habit_id).await?;

    let entry_value = request
        .entry_value
        .as_ref()
        .filter(|value| !value.is_null());
    validate_entry_value(habit.tracking_mode, entry_value)
        .map_err(|err| ServiceError::ValidationError(err.to_string()))?;

    let log = habit_log::upsert(
        conn,
        &NewHabitLog {
            habit_id: habit.id,
            date: request.date,
            status: request.status,
            entry_value,
            note: request.note.as_deref(),
        },
    )
    .await?;

    Ok(log)
}

/// ## Summary
/// Computes streak and consistency statistics for one of the user's habits.
///
/// ## Errors
/// Returns `ServiceError::NotFound` if the habit is not the user's, or a database error.
#[tracing::instrument(skip(conn))]
pub async fn load_habit_stats(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    habit_id: Uuid,
    today: NaiveDate,
) -> ServiceResult<HabitStats> {
    let habit = get_owned_habit(conn, user_id, habit_id).await?;
    let logs = habit_log::load_until(conn, &[habit.id], today).await?;

    Ok(habit_stats(&habit, &logs, today))
}
