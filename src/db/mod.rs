//! Database connection and repositories
//!
//! Repositories hold a pool clone and run one statement per call. The
//! free functions in each module (`count_matching`, `fetch_by_ids`, ...) take a
//! `&mut SqliteConnection` instead, so a caller can run several of them inside
//! one transaction and read a consistent snapshot.

pub mod books;
pub mod categories;
pub mod reviews;
pub mod schema_sync;
pub mod sqlite_helpers;
pub mod users;

use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub use books::{BookRecord, BookRepository, CreateBook, UpdateBook};
pub use categories::{CategoryRecord, CategoryRepository};
pub use reviews::{CreateReview, ReviewRecord, ReviewRepository};
pub use schema_sync::{SchemaSyncResult, sync_schema};
pub use users::{CreateUser, UserRecord, UsersRepository};

/// Database wrapper providing connection pool access
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn connect_options(url: &str) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);
        Ok(options)
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(Self::connect_options(url)?)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Ok(Self { pool })
    }

    /// Connect, retrying every `retry_interval` until `timeout` elapses
    pub async fn connect_with_retry(
        url: &str,
        max_connections: u32,
        retry_interval: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let started = Instant::now();
        loop {
            match Self::connect(url, max_connections).await {
                Ok(db) => return Ok(db),
                Err(e) if started.elapsed() + retry_interval < timeout => {
                    tracing::warn!(
                        error = %e,
                        retry_in_secs = retry_interval.as_secs(),
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(retry_interval).await;
                }
                Err(e) => return Err(e.context("Giving up on database connection")),
            }
        }
    }

    /// Private in-memory database on a single long-lived connection.
    /// Every pooled connection to `sqlite::memory:` would otherwise see its
    /// own empty database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(Self::connect_options("sqlite::memory:")?)
            .await
            .context("Failed to open in-memory database")?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a transaction. It rolls back when dropped without `commit`, so
    /// every early return releases it.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Get a books repository
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Get a categories repository
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    /// Get a reviews repository
    pub fn reviews(&self) -> ReviewRepository {
        ReviewRepository::new(self.pool.clone())
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    /// Create missing tables and columns, then fill folded search columns
    /// on rows that predate them
    pub async fn sync_schema(&self) -> Result<SchemaSyncResult> {
        let result = sync_schema(&self.pool)
            .await
            .context("Schema sync failed")?;
        books::refold_stale_rows(&self.pool)
            .await
            .context("Failed to backfill folded book columns")?;
        Ok(result)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
