use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use cadence_db::db::connection::DbConnection;
use cadence_db::db::query::daily_log;
use cadence_db::model::daily_log::{DailyLog, NewDailyLog};

use crate::error::{ServiceError, ServiceResult};

/// Accepted range for mood and energy scores.
pub const SCORE_RANGE: RangeInclusive<i32> = 1..=10;

#[derive(Debug, Clone, Deserialize)]
pub struct DailyLogRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub mood_score: Option<i32>,
    #[serde(default)]
    pub energy_level: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
}

impl DailyLogRequest {
    fn validate(&self) -> ServiceResult<()> {
        let scores = [
            ("mood_score", self.mood_score),
            ("energy_level", self.energy_level),
        ];
        for (field, value) in scores {
            if let Some(value) = value
                && !SCORE_RANGE.contains(&value)
            {
                return Err(ServiceError::ValidationError(format!(
                    "{field} must be between {} and {}, got {value}",
                    SCORE_RANGE.start(),
                    SCORE_RANGE.end()
                )));
            }
        }
        Ok(())
    }
}

/// ## Summary
/// Writes the user's journal entry for a day, replacing any earlier entry.
///
/// ## Errors
/// Returns `ServiceError::ValidationError` if a score is outside 1..=10, or a
/// database error.
#[tracing::instrument(skip(conn, request), fields(date = %request.date))]
pub async fn upsert_daily_log(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    request: &DailyLogRequest,
) -> ServiceResult<DailyLog> {
    request.validate()?;

    Ok(daily_log::upsert(
        conn,
        &NewDailyLog {
            user_id,
            date: request.date,
            mood_score: request.mood_score,
            energy_level: request.energy_level,
            note: request.note.as_deref(),
        },
    )
    .await?)
}
