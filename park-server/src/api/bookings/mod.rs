//! Booking API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/book-parking", post(handler::create_scheduled))
        .route("/api/walkin-booking", post(handler::create_walkin))
        .route("/api/bookings", get(handler::list))
        .route("/api/bookings/{id}/fee", get(handler::fee_quote))
        .route("/api/bookings/{id}/complete", put(handler::complete))
        .route("/api/bookings/{id}/cancel", put(handler::cancel))
}
