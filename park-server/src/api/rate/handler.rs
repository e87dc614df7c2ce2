//! Rate API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::rate;
use crate::utils::AppResult;
use shared::models::{RateInfo, RateUpdate};

/// GET /api/rate - 当前费率
pub async fn get_rate(State(state): State<ServerState>) -> AppResult<Json<RateInfo>> {
    let current = rate::current(state.pool()).await?;
    Ok(Json(RateInfo {
        rate_per_hour: current.map_or(rate::DEFAULT_RATE_PER_HOUR, |r| r.rate_per_hour),
    }))
}

/// PUT /api/rate - 更新费率 (管理端)
pub async fn update_rate(
    State(state): State<ServerState>,
    Json(payload): Json<RateUpdate>,
) -> AppResult<Json<RateInfo>> {
    let updated = rate::update_current(state.pool(), payload.rate_per_hour).await?;
    state.notify_changed();

    tracing::info!(rate_per_hour = updated.rate_per_hour, "Rate updated");
    Ok(Json(RateInfo {
        rate_per_hour: updated.rate_per_hour,
    }))
}
