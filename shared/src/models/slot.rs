//! Parking Slot Model

use serde::{Deserialize, Serialize};

/// Slot status (车位状态)
///
/// Pure function of the slot's non-terminal bookings:
/// - `available` — no pending/active booking references the slot
/// - `booked`    — a scheduled booking holds the slot (customer not arrived)
/// - `occupied`  — a vehicle is physically parked (walk-in or arrived)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum SlotStatus {
    #[default]
    Available,
    Booked,
    Occupied,
}

/// Parking slot entity (车位)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Slot {
    pub id: i64,
    /// Human-facing display number, unique across the facility (e.g. "213")
    pub slot_number: String,
    pub floor_number: i64,
    pub status: SlotStatus,
    pub created_at: i64,
}

/// Aggregate availability counts across the whole registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Availability {
    pub total: i64,
    pub available: i64,
    pub booked: i64,
    pub occupied: i64,
}
