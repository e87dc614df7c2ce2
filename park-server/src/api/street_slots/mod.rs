//! Street Slot API 模块
//!
//! 传感器设备通过 `PUT /slots/:slot_number` 上报占用状态；
//! 路径与建筑车位 API 分开，保持设备固件的简单性。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/slots", get(handler::list))
        .route("/slots/{slot_number}", put(handler::report_occupancy))
}
