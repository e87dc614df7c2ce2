//! Lifecycle Controller
//!
//! Drives a booking/slot pair through checkout and cancellation. Both
//! operations settle the booking and release the slot in one transaction —
//! the pair is never observably split.
//!
//! State machine: `pending → active → completed` (scheduled),
//! `active → completed` (walk-in), `pending → completed` (checkout without
//! a recorded arrival), `pending|active → cancelled`. Terminal states admit
//! nothing.

use sqlx::SqlitePool;

use crate::db;
use crate::db::repository::{RepoError, RepoResult, booking, slot};
use shared::models::{Booking, PaymentStatus};
use shared::util::now_millis;

/// Complete a booking: record departure time and amount, release the slot.
///
/// The amount is caller-supplied (pre-computed by the boundary via the fee
/// calculator); only a sanity guard is applied here.
pub async fn complete(pool: &SqlitePool, booking_id: i64, amount: f64) -> RepoResult<Booking> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(RepoError::Validation(format!(
            "amount must be a non-negative number, got {amount}"
        )));
    }

    let now = now_millis();
    settle(pool, booking_id, PaymentStatus::Completed, Some(amount), Some(now)).await
}

/// Cancel a booking: terminal state without payment, slot released.
pub async fn cancel(pool: &SqlitePool, booking_id: i64) -> RepoResult<Booking> {
    settle(pool, booking_id, PaymentStatus::Cancelled, None, None).await
}

async fn settle(
    pool: &SqlitePool,
    booking_id: i64,
    status: PaymentStatus,
    amount: Option<f64>,
    departure_time: Option<i64>,
) -> RepoResult<Booking> {
    let mut conn = db::begin_immediate(pool).await?;
    match settle_in_tx(&mut conn, booking_id, status, amount, departure_time).await {
        Ok(settled) => {
            db::commit(&mut conn).await?;
            Ok(settled)
        }
        Err(e) => {
            db::rollback(&mut conn).await;
            Err(e)
        }
    }
}

async fn settle_in_tx(
    conn: &mut sqlx::SqliteConnection,
    booking_id: i64,
    status: PaymentStatus,
    amount: Option<f64>,
    departure_time: Option<i64>,
) -> RepoResult<Booking> {
    let existing = booking::find_by_id(conn, booking_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Booking {booking_id} not found")))?;

    if existing.payment_status.is_terminal() {
        return Err(RepoError::InvalidState(format!(
            "Booking {booking_id} is already settled"
        )));
    }

    let now = now_millis();
    let rows = booking::settle(conn, booking_id, status, amount, departure_time, now).await?;
    if rows == 0 {
        // Raced with another settlement between the read and the guarded write
        return Err(RepoError::InvalidState(format!(
            "Booking {booking_id} is already settled"
        )));
    }

    slot::mark_available(conn, existing.slot_id).await?;

    booking::find_by_id(conn, booking_id)
        .await?
        .ok_or_else(|| RepoError::Database("Booking row vanished after settlement".into()))
}
