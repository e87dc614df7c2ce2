//! Booking Model

use serde::{Deserialize, Serialize};

/// Booking kind (预约方式)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum BookingKind {
    /// Booked ahead for an arrival within the lead-time window
    Scheduled,
    /// Customer already at the gate, enters directly into occupancy
    Walkin,
}

/// Booking payment state — doubles as the booking lifecycle state
///
/// `pending → active → completed` (scheduled path), `active → completed`
/// (walk-in path), `pending → completed` (checkout without a recorded
/// arrival). `pending|active → cancelled`. `completed` and `cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl PaymentStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Booking record — one reservation/occupancy episode
///
/// Append-only: bookings are transitioned, never deleted. `amount` and
/// `departure_time` are written exactly once, at completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub slot_id: i64,
    pub user_name: String,
    pub vehicle_number: String,
    pub phone_number: String,
    pub kind: BookingKind,
    pub booking_time: i64,
    pub arrival_time: i64,
    pub departure_time: Option<i64>,
    pub payment_status: PaymentStatus,
    pub amount: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Booking joined with its slot's display attributes (admin listing row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingWithSlot {
    pub id: i64,
    pub slot_id: i64,
    pub user_name: String,
    pub vehicle_number: String,
    pub phone_number: String,
    pub kind: BookingKind,
    pub booking_time: i64,
    pub arrival_time: i64,
    pub departure_time: Option<i64>,
    pub payment_status: PaymentStatus,
    pub amount: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub slot_number: String,
    pub floor_number: i64,
}

/// Create booking payload (both booking surfaces)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_name: String,
    pub vehicle_number: String,
    pub phone_number: String,
    /// Expected arrival (epoch millis). Required for scheduled bookings,
    /// ignored for walk-ins (walk-in arrival is "now").
    pub arrival_time: Option<i64>,
}

/// Complete booking payload (admin checkout)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingComplete {
    pub amount: f64,
}

/// Fee preview for a non-terminal booking, priced as of "now"
/// (admin checkout pre-computes the amount from this)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuote {
    pub booking_id: i64,
    pub billed_hours: i64,
    pub rate_per_hour: f64,
    pub amount: f64,
}

/// Booking confirmation returned by the booking surfaces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub booking_id: i64,
    pub slot_number: String,
    pub floor: i64,
    pub message: String,
}
