//! # Database Persistence Layer
//!
//! Postgres persistence for workers and credentials via SQLx.
//!
//! The database is **optional**. When `DATABASE_URL` is set, every write is
//! persisted before it becomes visible in memory, and the in-memory store is
//! hydrated from the tables at startup. When absent, the API runs in
//! in-memory-only mode (development and tests).

pub mod credentials;
pub mod workers;

use gigid_issuance::StoreError;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Connect to Postgres and run the embedded migrations.
///
/// Returns `None` when no URL is configured.
pub async fn init_pool(database_url: Option<&str>) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = database_url else {
        tracing::warn!(
            "DATABASE_URL not set; running in-memory only mode. \
             Workers and credentials will not survive restarts."
        );
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Map a database error onto the store error vocabulary.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.message().to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::NotFound(db.message().to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}
