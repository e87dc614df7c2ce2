//! Booking Ledger
//!
//! Append-only record of reservation/occupancy episodes. Rows are
//! transitioned through `payment_status`, never deleted.

use super::RepoResult;
use shared::models::{Booking, BookingKind, BookingWithSlot, PaymentStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

const SELECT_COLS: &str = "id, slot_id, user_name, vehicle_number, phone_number, kind, booking_time, arrival_time, departure_time, payment_status, amount, created_at, updated_at";

/// New booking row (written by the allocation engine, inside its transaction)
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub slot_id: i64,
    pub user_name: String,
    pub vehicle_number: String,
    pub phone_number: String,
    pub kind: BookingKind,
    pub booking_time: i64,
    pub arrival_time: i64,
    pub payment_status: PaymentStatus,
}

/// Insert a booking row and return its generated id
pub async fn insert(conn: &mut SqliteConnection, data: &NewBooking) -> RepoResult<i64> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO booking (id, slot_id, user_name, vehicle_number, phone_number, kind, booking_time, arrival_time, payment_status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.slot_id)
    .bind(&data.user_name)
    .bind(&data.vehicle_number)
    .bind(&data.phone_number)
    .bind(data.kind)
    .bind(data.booking_time)
    .bind(data.arrival_time)
    .bind(data.payment_status)
    .bind(now)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(id)
}

/// Find a booking by id
pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Booking>> {
    let booking = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {SELECT_COLS} FROM booking WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(booking)
}

/// Full booking listing joined with slot display attributes, newest first
pub async fn list_with_slots(pool: &SqlitePool) -> RepoResult<Vec<BookingWithSlot>> {
    let bookings = sqlx::query_as::<_, BookingWithSlot>(
        "SELECT b.id, b.slot_id, b.user_name, b.vehicle_number, b.phone_number, b.kind, \
         b.booking_time, b.arrival_time, b.departure_time, b.payment_status, b.amount, \
         b.created_at, b.updated_at, p.slot_number, p.floor_number \
         FROM booking b \
         JOIN parking_slot p ON b.slot_id = p.id \
         ORDER BY b.created_at DESC, b.id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(bookings)
}

/// Settle a non-terminal booking: departure time, amount and terminal
/// payment state are written exactly once.
///
/// The state guard in the WHERE clause makes the transition safe under
/// concurrent settlement attempts; 0 rows affected means the booking was
/// already terminal.
pub async fn settle(
    conn: &mut SqliteConnection,
    id: i64,
    status: PaymentStatus,
    amount: Option<f64>,
    departure_time: Option<i64>,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE booking SET payment_status = ?, amount = ?, departure_time = ?, updated_at = ? \
         WHERE id = ? AND payment_status IN ('pending', 'active')",
    )
    .bind(status)
    .bind(amount)
    .bind(departure_time)
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected())
}

/// Count non-terminal bookings referencing a slot (invariant check)
pub async fn count_open_for_slot(pool: &SqlitePool, slot_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM booking WHERE slot_id = ? AND payment_status IN ('pending', 'active')",
    )
    .bind(slot_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
