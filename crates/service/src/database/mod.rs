//! sqlite-backed metadata store for nodes and roots.

mod node_queries;
mod root_queries;

pub use node_queries::{CreateNodeError, CreateNodeParams, NodeQueryError};
pub use root_queries::{CreateRootError, CreateRootParams, RootQueryError};

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("invalid database url: {0}")]
    InvalidUrl(sqlx::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// SQLite database connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `url` (e.g. `sqlite://wsio.db` or `sqlite::memory:`),
    /// creating the file and running migrations as needed.
    pub async fn connect(url: &str) -> Result<Self, DatabaseSetupError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(DatabaseSetupError::InvalidUrl)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        // In-memory databases are per-connection; a pool of one keeps every
        // query on the same database.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn in_memory() -> Result<Self, DatabaseSetupError> {
        Self::connect("sqlite::memory:").await
    }

    async fn run_migrations(&self) -> Result<(), DatabaseSetupError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Liveness probe used by the readiness endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_setup_and_ping() {
        let db = Database::in_memory().await.unwrap();
        db.ping().await.unwrap();
    }
}
