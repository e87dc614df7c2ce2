//! Slot Registry
//!
//! Authoritative record of every building parking slot and its status.
//! Status is only ever written together with the booking row that justifies
//! it, inside the caller's transaction.

use super::{RepoError, RepoResult};
use shared::models::{Availability, Slot, SlotStatus};
use sqlx::{SqliteConnection, SqlitePool};

/// Find one eligible (available) slot.
///
/// Deterministic order — floor ascending, then display number — so
/// concurrent callers converge on the same candidate; exclusivity is
/// enforced by [`mark_reserved`], not by this read.
pub async fn find_eligible(conn: &mut SqliteConnection) -> RepoResult<Option<Slot>> {
    let slot = sqlx::query_as::<_, Slot>(
        "SELECT id, slot_number, floor_number, status, created_at FROM parking_slot WHERE status = 'available' ORDER BY floor_number, slot_number LIMIT 1",
    )
    .fetch_optional(conn)
    .await?;
    Ok(slot)
}

/// Reserve a slot: available -> booked | occupied.
///
/// Optimistic check: the status guard in the WHERE clause loses the race
/// when another allocation claimed the slot first.
pub async fn mark_reserved(
    conn: &mut SqliteConnection,
    slot_id: i64,
    status: SlotStatus,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE parking_slot SET status = ? WHERE id = ? AND status = 'available'")
        .bind(status)
        .bind(slot_id)
        .execute(&mut *conn)
        .await?;

    if rows.rows_affected() == 0 {
        // Distinguish a vanished slot from a lost race
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parking_slot WHERE id = ?")
            .bind(slot_id)
            .fetch_one(conn)
            .await?;
        if exists == 0 {
            return Err(RepoError::NotFound(format!("Slot {slot_id} not found")));
        }
        return Err(RepoError::Conflict(format!(
            "Slot {slot_id} is no longer available"
        )));
    }
    Ok(())
}

/// Release a slot back to available.
///
/// Idempotent: releasing an already-available slot is a no-op.
pub async fn mark_available(conn: &mut SqliteConnection, slot_id: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE parking_slot SET status = 'available' WHERE id = ?")
        .bind(slot_id)
        .execute(conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Slot {slot_id} not found")));
    }
    Ok(())
}

/// Point-in-time aggregate counts across the whole registry
pub async fn aggregate_counts(pool: &SqlitePool) -> RepoResult<Availability> {
    let counts = sqlx::query_as::<_, Availability>(
        "SELECT COUNT(*) AS total, \
         COALESCE(SUM(status = 'available'), 0) AS available, \
         COALESCE(SUM(status = 'booked'), 0) AS booked, \
         COALESCE(SUM(status = 'occupied'), 0) AS occupied \
         FROM parking_slot",
    )
    .fetch_one(pool)
    .await?;
    Ok(counts)
}
