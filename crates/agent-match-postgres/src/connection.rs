use std::time::Duration;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, info};

use agent_match_core::CoreError;

use crate::migrations;
use crate::store::map_sqlx_error;
use crate::PostgresConfig;

/// Create a new PostgreSQL connection pool
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, CoreError> {
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.connection_string)
        .await
        .map_err(|e| map_sqlx_error("Failed to connect to PostgreSQL", e))?;

    debug!(max_connections = config.max_connections, "Connected to PostgreSQL database");
    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), CoreError> {
    debug!("Running PostgreSQL migrations...");

    for (migration_name, migration_sql) in
        migrations::generate_migrations(&config.table_name, config.dimension, &config.index)
    {
        debug!("Applying migration: {}", migration_name);

        // raw_sql uses the simple query protocol, which accepts several statements.
        sqlx::raw_sql(&migration_sql)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("Migration '{}' failed", migration_name), e))?;
    }

    info!(table = %config.table_name, "PostgreSQL migrations completed successfully");
    Ok(())
}
