//! Availability API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::slot;
use crate::utils::AppResult;
use shared::models::Availability;

/// GET /api/availability - 全场车位统计
pub async fn get_availability(State(state): State<ServerState>) -> AppResult<Json<Availability>> {
    let counts = slot::aggregate_counts(state.pool()).await?;
    Ok(Json(counts))
}
