//! Shared types for the parking edge server
//!
//! Common types used by the server and native clients: domain models,
//! message bus wire types, and small utilities.

pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BusMessage, EventType};
