//! Rate API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/rate",
        get(handler::get_rate).put(handler::update_rate),
    )
}
