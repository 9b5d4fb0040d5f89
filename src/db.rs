//! Database bootstrap: connection pool and embedded migrations.
//!
//! Migrations live in `migrations/` at the crate root and are compiled into the
//! binary with `sqlx::migrate!`, so a fresh database is brought up to date on startup.

use std::time::Duration;

use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Opens a connection pool sized from `config`.
pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!(
        "Connecting to database (max {} connections)",
        config.database_max_connections
    );
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
}

/// Applies any pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations are up to date");
    Ok(())
}
