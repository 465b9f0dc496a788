//! Embedded schema migrations.

use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{DbError, DbResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// ## Summary
/// Applies all pending migrations to the database at `database_url`.
///
/// Runs on a blocking thread because the migration harness needs a synchronous
/// connection.
///
/// ## Errors
/// Returns `DbError::MigrationError` if the connection cannot be established or
/// a migration fails.
#[tracing::instrument(skip(database_url))]
pub async fn run_migrations(database_url: &str) -> DbResult<usize> {
    let url = database_url.to_owned();

    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = diesel::PgConnection::establish(&url)
            .map_err(|err| DbError::MigrationError(err.to_string()))?;
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| DbError::MigrationError(err.to_string()))?;
        Ok::<_, DbError>(versions.len())
    })
    .await
    .map_err(|err| DbError::MigrationError(err.to_string()))??;

    tracing::info!(applied, "Migrations applied");
    Ok(applied)
}
