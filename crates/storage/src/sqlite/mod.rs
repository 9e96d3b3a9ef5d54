use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, Connection, SqlitePool};
use thiserror::Error;

use crate::repository::{AccountRepository, GradeRepository, Storage};

mod account_repo;
mod grade_repo;
mod mapping;
mod migrate;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Account and grade storage over a migrated `SQLite` database.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error("cannot open database: {0}")]
    Open(#[source] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migration(#[from] sqlx::Error),
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, SqliteInitError> {
    let options = database_url
        .parse::<SqliteConnectOptions>()
        .map_err(SqliteInitError::Open)?;
    Ok(options
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT))
}

impl SqliteRepository {
    /// Open the database at `database_url` with an up-to-date schema.
    ///
    /// Migrations run on a dedicated connection before the serving pool
    /// exists. A connection that cached the schema before the grade index was
    /// created rejects the upsert, so every pooled connection must be opened
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError::Open` if the URL is invalid or a connection
    /// cannot be established, and `SqliteInitError::Migration` if a schema
    /// step fails.
    pub async fn open(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = connect_options(database_url)?;

        let mut migrator = options.connect().await.map_err(SqliteInitError::Open)?;
        migrate::run_migrations(&mut migrator).await?;

        // The pool opens its first connection before the migrator closes, so
        // an in-memory database survives the hand-over.
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(SqliteInitError::Open)?;
        if let Err(err) = migrator.close().await {
            tracing::debug!(error = %err, "closing migration connection failed");
        }

        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened or migrated.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::open(database_url).await?;
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo.clone());
        let grades: Arc<dyn GradeRepository> = Arc::new(repo);
        Ok(Self { accounts, grades })
    }
}
