//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::booking::{engine, lifecycle};
use crate::core::ServerState;
use crate::db::repository::{booking, rate};
use crate::pricing;
use crate::utils::{AppError, AppResult};
use shared::models::{
    Booking, BookingComplete, BookingConfirmation, BookingKind, BookingRequest, BookingWithSlot,
    FeeQuote,
};
use shared::util::now_millis;

/// POST /api/book-parking - 创建预约 (计划到场)
pub async fn create_scheduled(
    State(state): State<ServerState>,
    Json(payload): Json<BookingRequest>,
) -> AppResult<(StatusCode, Json<BookingConfirmation>)> {
    tracing::info!(
        user = %payload.user_name,
        vehicle = %payload.vehicle_number,
        "🚗 Booking request received"
    );

    let allocation = engine::allocate(state.pool(), BookingKind::Scheduled, &payload).await?;
    state.notify_changed();

    tracing::info!(
        booking_id = allocation.booking.id,
        slot = %allocation.slot.slot_number,
        floor = allocation.slot.floor_number,
        "✅ Booking successful"
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingConfirmation {
            booking_id: allocation.booking.id,
            slot_number: allocation.slot.slot_number,
            floor: allocation.slot.floor_number,
            message: "Parking slot booked successfully!".into(),
        }),
    ))
}

/// POST /api/walkin-booking - 现场直接入场
pub async fn create_walkin(
    State(state): State<ServerState>,
    Json(payload): Json<BookingRequest>,
) -> AppResult<(StatusCode, Json<BookingConfirmation>)> {
    tracing::info!(
        user = %payload.user_name,
        vehicle = %payload.vehicle_number,
        "🚶 Walk-in booking request received"
    );

    let allocation = engine::allocate(state.pool(), BookingKind::Walkin, &payload).await?;
    state.notify_changed();

    tracing::info!(
        booking_id = allocation.booking.id,
        slot = %allocation.slot.slot_number,
        floor = allocation.slot.floor_number,
        "✅ Walk-in booking successful"
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingConfirmation {
            booking_id: allocation.booking.id,
            slot_number: allocation.slot.slot_number,
            floor: allocation.slot.floor_number,
            message: "Walk-in booking successful! Customer is now parked and slot is active."
                .into(),
        }),
    ))
}

/// GET /api/bookings - 预约列表 (管理端)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<BookingWithSlot>>> {
    let bookings = booking::list_with_slots(state.pool()).await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/:id/fee - 按当前时刻预览应收费用
///
/// Completion still records the caller-supplied amount; this is the
/// server-side pricing the admin boundary is expected to use.
pub async fn fee_quote(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<FeeQuote>> {
    let mut conn = state
        .pool()
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let existing = booking::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))?;
    drop(conn);

    if existing.payment_status.is_terminal() {
        return Err(AppError::InvalidState(format!(
            "Booking {id} is already settled"
        )));
    }

    let rate_per_hour = rate::current(state.pool())
        .await?
        .map_or(rate::DEFAULT_RATE_PER_HOUR, |r| r.rate_per_hour);
    let now = now_millis();

    Ok(Json(FeeQuote {
        booking_id: id,
        billed_hours: pricing::billable_hours(existing.arrival_time, now),
        rate_per_hour,
        amount: pricing::compute_fee(existing.arrival_time, now, rate_per_hour),
    }))
}

/// PUT /api/bookings/:id/complete - 结账完成并释放车位
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingComplete>,
) -> AppResult<Json<Booking>> {
    tracing::info!(booking_id = id, amount = payload.amount, "💰 Processing payment completion");

    let settled = lifecycle::complete(state.pool(), id, payload.amount).await?;
    state.notify_changed();

    Ok(Json(settled))
}

/// PUT /api/bookings/:id/cancel - 取消预约并释放车位
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let cancelled = lifecycle::cancel(state.pool(), id).await?;
    state.notify_changed();

    Ok(Json(cancelled))
}
