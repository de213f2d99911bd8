use crate::config::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while bringing up the Postgres store
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to the lottery database: {0}")]
    Connect(sqlx::Error),

    #[error("Failed to apply lottery schema migrations: {0}")]
    Migration(#[from] MigrateError),
}

/// Connection pool for the events and applications tables
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Wrap an existing pool whose schema is already migrated
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from config and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = create_pool(config).await?;
        info!(
            "Database pool ready (max {} connections)",
            config.max_connections
        );

        run_migrations(&pool, Some(&config.migrations_path)).await?;
        info!("Schema migrations applied from {}", config.migrations_path);

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Create a PostgreSQL connection pool and check it answers
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .test_before_acquire(config.test_before_acquire)
        .connect(&config.url)
        .await
        .map_err(DatabaseError::Connect)?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(DatabaseError::Connect)?;

    Ok(pool)
}

/// Apply pending migrations; already-applied ones are skipped
///
/// `migrations_path` defaults to `./migrations`.
pub async fn run_migrations(
    pool: &PgPool,
    migrations_path: Option<&str>,
) -> Result<(), DatabaseError> {
    let migrator = Migrator::new(Path::new(migrations_path.unwrap_or("./migrations"))).await?;
    migrator.run(pool).await?;
    Ok(())
}
