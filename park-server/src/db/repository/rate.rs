//! Rate Repository
//!
//! Single canonical fee policy: the lowest-id active row. Administrative
//! updates mutate that row in place (no history retained).

use super::{RepoError, RepoResult};
use shared::models::Rate;
use shared::util::now_millis;
use sqlx::SqlitePool;

/// Fallback when no rate row is seeded
pub const DEFAULT_RATE_PER_HOUR: f64 = 50.0;

/// Current canonical rate, if any
pub async fn current(pool: &SqlitePool) -> RepoResult<Option<Rate>> {
    let rate = sqlx::query_as::<_, Rate>(
        "SELECT id, rate_per_hour, is_active, effective_from, created_at, updated_at \
         FROM rate WHERE is_active = 1 ORDER BY id LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(rate)
}

/// Update the canonical rate row in place
pub async fn update_current(pool: &SqlitePool, rate_per_hour: f64) -> RepoResult<Rate> {
    if !rate_per_hour.is_finite() || rate_per_hour < 0.0 {
        return Err(RepoError::Validation(format!(
            "ratePerHour must be a non-negative number, got {rate_per_hour}"
        )));
    }

    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE rate SET rate_per_hour = ?, updated_at = ? \
         WHERE id = (SELECT id FROM rate WHERE is_active = 1 ORDER BY id LIMIT 1)",
    )
    .bind(rate_per_hour)
    .bind(now)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound("No active rate configured".into()));
    }

    current(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound("No active rate configured".into()))
}
