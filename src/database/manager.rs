use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Schema bootstrap failed for '{object}': {source}")]
    Schema {
        object: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// True when the failure is about reaching the database rather than the statement itself
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
                | DatabaseError::Sqlx(sqlx::Error::PoolClosed)
                | DatabaseError::Sqlx(sqlx::Error::Io(_))
        )
    }
}

/// Builds the SQLite pool the store runs on. The pool is created once by the
/// caller and handed to [`crate::database::ResourceStore`]; nothing here keeps
/// a process-wide handle.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open (creating if needed) the database file named by `config.url`
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        if !config.url.starts_with("sqlite:") {
            return Err(DatabaseError::InvalidDatabaseUrl(config.url.clone()));
        }

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl(config.url.clone()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        info!(url = %config.url, max_connections = config.max_connections, "Opened database pool");
        Ok(pool)
    }

    /// Single-connection in-memory database. The connection is pinned so the
    /// data outlives idle periods.
    pub async fn in_memory() -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
