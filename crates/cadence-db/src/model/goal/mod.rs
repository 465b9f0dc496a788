use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

pub mod progress;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = schema::goals)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(crate::model::user::User, foreign_key = user_id))]
pub struct Goal {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub name: String,
    pub category: String,
    /// False once archived
    pub is_active: bool,
    pub is_completed: bool,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completion_note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::goals)]
pub struct NewGoal<'a> {
    pub user_id: uuid::Uuid,
    pub name: &'a str,
    pub category: &'a str,
}
