//! Repository Module
//!
//! CRUD and state-transition queries, as free functions over sqlx
//! executors. Functions taking `&mut SqliteConnection` participate in a
//! caller-owned transaction; functions taking `&SqlitePool` are
//! single-statement or read-only.

// Building parking
pub mod booking;
pub mod slot;

// Fee policy
pub mod rate;

// Street parking (sensor-reported)
pub mod street_slot;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    /// 无可用车位
    #[error("No parking slots available")]
    NoAvailability,

    /// 乐观状态检查落败（写入竞争）
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 状态机拒绝从终态或错误状态转换
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
