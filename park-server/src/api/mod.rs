//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`availability`] - 车位统计接口
//! - [`bookings`] - 预约管理接口
//! - [`rate`] - 费率管理接口
//! - [`street_slots`] - 路边车位接口 (传感器设备上报)

pub mod availability;
pub mod bookings;
pub mod health;
pub mod rate;
pub mod street_slots;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// 组装完整路由
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(availability::router())
        .merge(bookings::router())
        .merge(rate::router())
        .merge(street_slots::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
