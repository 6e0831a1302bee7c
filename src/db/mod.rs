//! Connection pool and storage statements.
//!
//! [`Db`] wraps a bounded sqlx pool. It is built once at startup and injected
//! into the router state; nothing in the crate reaches for a global pool.
//!
//! Connections come back to the pool when the [`PoolConnection`] returned by
//! [`Db::acquire`] is dropped, so a handler that binds it to a local releases
//! it exactly once however it exits.

pub mod customers;
pub mod orders;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use sqlx::error::ErrorKind;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// A failure from the pool or from statement execution.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("timed out waiting for a pooled connection")]
    PoolExhausted,

    #[error("could not connect to the database within {0:?}")]
    ConnectTimeout(Duration),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StorageError {
    /// Stable, client-facing classification of the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PoolExhausted => "pool_exhausted",
            Self::ConnectTimeout(_) => "connect_timeout",
            Self::Constraint(_) => "constraint_violation",
            Self::Database(_) => "storage_failure",
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => Self::PoolExhausted,
            sqlx::Error::Database(db) if is_constraint(db.kind()) => {
                Self::Constraint(db.message().to_owned())
            }
            other => Self::Database(other),
        }
    }
}

fn is_constraint(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation
    )
}

/// The shared connection pool. Cloning is cheap; clones share one pool.
#[derive(Clone, Debug)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Opens the pool described by `config`.
    ///
    /// The initial connect is bounded by `connect_timeout`; per-request waits
    /// for a free connection are bounded separately by `acquire_timeout`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.url)?;

        let connecting = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options);

        let pool = within_connect_timeout(config.connect_timeout(), connecting).await?;

        info!(
            max_connections = config.max_connections,
            acquire_timeout_secs = config.acquire_timeout_secs,
            "database pool ready",
        );
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks a connection out of the pool, waiting at most `acquire_timeout`.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, StorageError> {
        let conn = self.pool.acquire().await?;
        debug!(size = self.pool.size(), idle = self.pool.num_idle(), "connection acquired");
        Ok(conn)
    }

    /// Round-trips a trivial statement on a pooled connection.
    pub async fn ping(&self) -> Result<(), StorageError> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    /// Waits for checked-out connections to come back, then closes them all.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

/// Bounds the initial connect. Driver errors are classified as usual.
async fn within_connect_timeout<T>(
    limit: Duration,
    connecting: impl Future<Output = Result<T, sqlx::Error>>,
) -> Result<T, StorageError> {
    match tokio::time::timeout(limit, connecting).await {
        Ok(connected) => Ok(connected?),
        Err(_) => Err(StorageError::ConnectTimeout(limit)),
    }
}
