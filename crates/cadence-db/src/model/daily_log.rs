use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

/// Per-day mood/energy journal entry. Unique per `(user_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = schema::daily_logs)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(crate::model::user::User, foreign_key = user_id))]
pub struct DailyLog {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub date: chrono::NaiveDate,
    pub mood_score: Option<i32>,
    pub energy_level: Option<i32>,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::daily_logs)]
pub struct NewDailyLog<'a> {
    pub user_id: uuid::Uuid,
    pub date: chrono::NaiveDate,
    pub mood_score: Option<i32>,
    pub energy_level: Option<i32>,
    pub note: Option<&'a str>,
}
