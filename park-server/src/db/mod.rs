//! Database Module
//!
//! Handles the SQLite connection pool, migrations, and write transactions.

pub mod repository;

use crate::utils::AppError;
use repository::RepoError;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;

/// Storage backend selected at startup (see [`DbService::new`] / [`DbService::in_memory`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// File-backed SQLite under the work directory
    Durable,
    /// In-memory SQLite (single connection), used when the durable
    /// store cannot be opened or when explicitly configured
    Memory,
}

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
    pub mode: StorageMode,
}

impl DbService {
    /// Create a file-backed database service with WAL mode
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(&pool).await?;

        Ok(Self {
            pool,
            mode: StorageMode::Durable,
        })
    }

    /// Create an in-memory database service
    ///
    /// 单连接池：每个 SQLite `:memory:` 连接都是一个独立数据库，
    /// 连接必须常驻，否则数据随连接一起消失。
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid connect options: {e}")))?
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        tracing::info!("Database connection established (SQLite in-memory)");

        Self::migrate(&pool).await?;

        Ok(Self {
            pool,
            mode: StorageMode::Memory,
        })
    }

    /// Run migrations (ignore previously applied but now removed migrations)
    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

/// Acquire a connection and open a write transaction on it.
///
/// BEGIN IMMEDIATE 先取写锁，并发写入方在 busy_timeout 内排队，
/// 避免事务中途升级写锁时出现 SQLITE_BUSY。
pub async fn begin_immediate(pool: &SqlitePool) -> Result<PoolConnection<Sqlite>, RepoError> {
    let mut conn = pool.acquire().await?;
    sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
    Ok(conn)
}

/// Commit the write transaction opened by [`begin_immediate`].
pub async fn commit(conn: &mut PoolConnection<Sqlite>) -> Result<(), RepoError> {
    sqlx::query("COMMIT").execute(&mut **conn).await?;
    Ok(())
}

/// Roll back the write transaction opened by [`begin_immediate`].
///
/// Best-effort: the connection is unusable for further statements in this
/// transaction either way.
pub async fn rollback(conn: &mut PoolConnection<Sqlite>) {
    if let Err(e) = sqlx::query("ROLLBACK").execute(&mut **conn).await {
        tracing::warn!("Transaction rollback failed: {e}");
    }
}
