//! Data models
//!
//! Shared between park-server and clients (via API and message bus).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).
//! All timestamps are UTC epoch milliseconds.

pub mod booking;
pub mod rate;
pub mod slot;
pub mod street_slot;

// Re-exports
pub use booking::*;
pub use rate::*;
pub use slot::*;
pub use street_slot::*;
