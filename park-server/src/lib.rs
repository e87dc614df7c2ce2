//! Park Edge Server - 停车场预约与车位管理边缘节点
//!
//! # 架构概述
//!
//! 本模块是停车场服务端的主入口，提供以下核心功能：
//!
//! - **分配引擎** (`booking::engine`): 原子选位与预约建立
//! - **生命周期** (`booking::lifecycle`): 结账、取消与车位释放
//! - **计费** (`pricing`): 纯函数时长计费
//! - **消息总线** (`message`): 支持 TCP/Memory 传输的实时快照推送
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (durable / in-memory)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! park-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── booking/       # 分配引擎与生命周期控制
//! ├── pricing/       # 费用计算
//! ├── db/            # 数据库层
//! ├── message/       # 消息总线
//! ├── notifier.rs    # 快照广播
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod booking;
pub mod core;
pub mod db;
pub mod message;
pub mod notifier;
pub mod pricing;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use message::{BusMessage, EventType};
pub use notifier::Notifier;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv, 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), None);

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____             __
   / __ \____ ______/ /__
  / /_/ / __ `/ ___/ //_/
 / ____/ /_/ / /  / ,<
/_/    \__,_/_/  /_/|_|
    ______    __
   / ____/___/ /___ ____
  / __/ / __  / __ `/ _ \
 / /___/ /_/ / /_/ /  __/
/_____/\__,_/\__, /\___/
            /____/
    "#
    );
}
