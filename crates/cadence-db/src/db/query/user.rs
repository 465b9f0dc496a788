//! Query composition for `users`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::users;
use crate::model::user::{NewUser, User};

/// ## Summary
/// Inserts a user and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails (including a duplicate email).
pub async fn create_user(conn: &mut DbConnection<'_>, new_user: &NewUser<'_>) -> QueryResult<User> {
    diesel::insert_into(users::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Loads a user by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_user(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> QueryResult<Option<User>> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}
