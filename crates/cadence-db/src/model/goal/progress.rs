use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

/// Daily "did I move forward" note on a goal. Unique per `(goal_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = schema::goal_progress)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(super::Goal, foreign_key = goal_id))]
pub struct GoalProgress {
    pub id: uuid::Uuid,
    pub goal_id: uuid::Uuid,
    pub date: chrono::NaiveDate,
    pub moved_forward: bool,
    pub note: Option<String>,
    pub source_habit_id: Option<uuid::Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::goal_progress)]
pub struct NewGoalProgress<'a> {
    pub goal_id: uuid::Uuid,
    pub date: chrono::NaiveDate,
    pub moved_forward: bool,
    pub note: Option<&'a str>,
    pub source_habit_id: Option<uuid::Uuid>,
}
