//! Street Slot API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::street_slot;
use crate::utils::{AppError, AppResult};
use shared::models::{StreetSlot, StreetSlotReport};

/// GET /slots - 全部路边车位
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<StreetSlot>>> {
    let slots = street_slot::find_all(state.pool()).await?;
    tracing::debug!(count = slots.len(), "📍 Street parking slots fetched");
    Ok(Json(slots))
}

/// PUT /slots/:slot_number - 传感器上报占用状态
pub async fn report_occupancy(
    State(state): State<ServerState>,
    Path(slot_number): Path<String>,
    Json(payload): Json<StreetSlotReport>,
) -> AppResult<Json<StreetSlot>> {
    tracing::info!(slot = %slot_number, status = %payload.status, "🤖 Sensor report");

    let occupied = payload.as_occupied().ok_or_else(|| {
        AppError::validation(format!(
            "Status must be 'available' or 'occupied', received '{}'",
            payload.status
        ))
    })?;

    let slot = street_slot::set_occupancy(state.pool(), &slot_number, occupied).await?;
    state.notify_changed();

    Ok(Json(slot))
}
