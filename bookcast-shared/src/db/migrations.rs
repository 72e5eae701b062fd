//! Database migration runner.
//!
//! Migrations live in `migrations/` at the crate root and are embedded into
//! the binary with `sqlx::migrate!`. Both binaries run them at startup, so
//! a fresh database (including the seeded book catalog) needs no manual
//! setup.

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending database migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply. Failed migrations are
/// rolled back where PostgreSQL allows it.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist.
///
/// Useful for development and testing; production databases should already
/// exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    info!("Checking if database exists");

    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
        info!("Database created successfully");
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
