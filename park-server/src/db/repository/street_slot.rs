//! Street Slot Repository
//!
//! Occupancy is written directly from sensor reports; there is no booking
//! relationship and no transaction to coordinate with.

use super::{RepoError, RepoResult};
use shared::models::StreetSlot;
use shared::util::now_millis;
use sqlx::SqlitePool;

/// All street slots, ordered by display number
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<StreetSlot>> {
    let slots = sqlx::query_as::<_, StreetSlot>(
        "SELECT id, slot_number, occupied, last_updated FROM street_slot ORDER BY slot_number",
    )
    .fetch_all(pool)
    .await?;
    Ok(slots)
}

/// Set a street slot's occupancy by display number
pub async fn set_occupancy(
    pool: &SqlitePool,
    slot_number: &str,
    occupied: bool,
) -> RepoResult<StreetSlot> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE street_slot SET occupied = ?, last_updated = ? WHERE slot_number = ?")
        .bind(occupied)
        .bind(now)
        .bind(slot_number)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Street parking slot {slot_number} not found"
        )));
    }

    let slot = sqlx::query_as::<_, StreetSlot>(
        "SELECT id, slot_number, occupied, last_updated FROM street_slot WHERE slot_number = ?",
    )
    .bind(slot_number)
    .fetch_one(pool)
    .await?;
    Ok(slot)
}
