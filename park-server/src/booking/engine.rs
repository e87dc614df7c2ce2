//! Allocation Engine
//!
//! Finds an eligible slot and creates the paired booking record as one
//! atomic unit. Correctness under concurrent callers is delegated to the
//! store's transaction plus the optimistic status check in
//! [`slot::mark_reserved`] — no in-process locking.

use sqlx::SqlitePool;

use crate::db;
use crate::db::repository::booking::NewBooking;
use crate::db::repository::{RepoError, RepoResult, booking, slot};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PHONE_LEN, MAX_VEHICLE_LEN, validate_required_text,
};
use shared::models::{Booking, BookingKind, BookingRequest, Slot};
use shared::util::now_millis;

/// Scheduled arrivals must fall within this window from "now"
pub const ARRIVAL_WINDOW_MS: i64 = 30 * 60 * 1000;

/// Result of a successful allocation: the booking and the slot it claimed
#[derive(Debug, Clone)]
pub struct Allocation {
    pub booking: Booking,
    pub slot: Slot,
}

/// Allocate a slot and create the paired booking.
///
/// If the optimistic reserve check loses a race, the whole allocation is
/// retried once against a freshly read eligible slot; a second loss
/// surfaces as [`RepoError::NoAvailability`]. 单次重试即可避免活锁。
pub async fn allocate(
    pool: &SqlitePool,
    kind: BookingKind,
    req: &BookingRequest,
) -> RepoResult<Allocation> {
    validate_request(kind, req, now_millis())?;

    match try_allocate(pool, kind, req).await {
        Err(RepoError::Conflict(_)) => match try_allocate(pool, kind, req).await {
            Err(RepoError::Conflict(_)) => Err(RepoError::NoAvailability),
            other => other,
        },
        other => other,
    }
}

/// Defensive re-validation — the HTTP boundary validates first, the engine
/// does not trust it.
fn validate_request(kind: BookingKind, req: &BookingRequest, now: i64) -> RepoResult<()> {
    validate_required_text(&req.user_name, "userName", MAX_NAME_LEN)?;
    validate_required_text(&req.vehicle_number, "vehicleNumber", MAX_VEHICLE_LEN)?;
    validate_required_text(&req.phone_number, "phoneNumber", MAX_PHONE_LEN)?;

    if kind == BookingKind::Scheduled {
        let arrival = req.arrival_time.ok_or_else(|| {
            RepoError::Validation("arrivalTime is required for scheduled bookings".into())
        })?;
        if arrival < now {
            return Err(RepoError::Validation(
                "arrivalTime must not be in the past".into(),
            ));
        }
        if arrival > now + ARRIVAL_WINDOW_MS {
            return Err(RepoError::Validation(
                "arrivalTime must be within the next 30 minutes".into(),
            ));
        }
    }
    Ok(())
}

/// One allocation attempt: slot reserve + booking insert in one transaction
async fn try_allocate(
    pool: &SqlitePool,
    kind: BookingKind,
    req: &BookingRequest,
) -> RepoResult<Allocation> {
    let mut conn = db::begin_immediate(pool).await?;
    match allocate_in_tx(&mut conn, kind, req).await {
        Ok(allocation) => {
            db::commit(&mut conn).await?;
            Ok(allocation)
        }
        Err(e) => {
            db::rollback(&mut conn).await;
            Err(e)
        }
    }
}

async fn allocate_in_tx(
    conn: &mut sqlx::SqliteConnection,
    kind: BookingKind,
    req: &BookingRequest,
) -> RepoResult<Allocation> {
    let now = now_millis();

    let Some(mut claimed) = slot::find_eligible(conn).await? else {
        return Err(RepoError::NoAvailability);
    };

    let (slot_status, payment_status) = super::entry_states(kind);
    slot::mark_reserved(conn, claimed.id, slot_status).await?;
    claimed.status = slot_status;

    let arrival_time = match kind {
        BookingKind::Scheduled => req.arrival_time.unwrap_or(now),
        BookingKind::Walkin => now,
    };

    let booking_id = booking::insert(
        conn,
        &NewBooking {
            slot_id: claimed.id,
            user_name: req.user_name.trim().to_string(),
            vehicle_number: req.vehicle_number.trim().to_string(),
            phone_number: req.phone_number.trim().to_string(),
            kind,
            booking_time: now,
            arrival_time,
            payment_status,
        },
    )
    .await?;

    let created = booking::find_by_id(conn, booking_id)
        .await?
        .ok_or_else(|| RepoError::Database("Booking row vanished after insert".into()))?;

    Ok(Allocation {
        booking: created,
        slot: claimed,
    })
}
