use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::{DbService, StorageMode};
use crate::message::{MessageBus, MessageHandler, TransportConfig};
use crate::notifier::Notifier;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是边缘节点的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | message_bus | Arc<MessageBus> | 消息总线 |
/// | notifier | Notifier | 快照广播 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// 消息总线
    pub message_bus: Arc<MessageBus>,
    /// 快照广播器
    pub notifier: Notifier,
    /// 启动时刻 (用于健康检查 uptime)
    started_at: Instant,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 存储后端 (durable 打不开时回退 in-memory)
    /// 3. 消息总线与快照广播器
    ///
    /// # Panics
    ///
    /// 两种存储后端都无法初始化时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Select the storage backend — once, at startup
        let db = Self::open_storage(config).await;

        // 2. Message bus + notifier
        let message_bus = Arc::new(MessageBus::from_config(TransportConfig {
            tcp_listen_addr: format!("0.0.0.0:{}", config.message_tcp_port),
            channel_capacity: 1024,
        }));
        let notifier = Notifier::new(db.pool.clone(), message_bus.clone());

        Self {
            config: config.clone(),
            db,
            message_bus,
            notifier,
            started_at: Instant::now(),
        }
    }

    async fn open_storage(config: &Config) -> DbService {
        if config.storage_mode == "memory" {
            return DbService::in_memory()
                .await
                .expect("Failed to initialize in-memory database");
        }

        let db_path = config.database_dir().join("park.db");
        match DbService::new(&db_path.to_string_lossy()).await {
            Ok(db) => db,
            Err(e) => {
                tracing::error!("❌ Database connection failed: {}", e);
                tracing::warn!("🔧 Falling back to in-memory storage");
                DbService::in_memory()
                    .await
                    .expect("Failed to initialize in-memory database")
            }
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 消息处理器 (MessageHandler): 观察者握手 -> 重发快照
    pub fn start_background_tasks(&self) {
        let handler = MessageHandler::new(
            self.message_bus.subscribe_to_clients(),
            self.message_bus.shutdown_token().clone(),
            self.notifier.clone(),
        );
        tokio::spawn(async move {
            handler.run().await;
        });
        tracing::debug!("Message handler started in background");
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 当前存储模式
    pub fn storage_mode(&self) -> StorageMode {
        self.db.mode
    }

    /// 运行时间 (秒)
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// 广播最新快照
    ///
    /// 状态变更已提交后调用；不阻塞调用方的响应。
    pub fn notify_changed(&self) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            notifier.publish().await;
        });
    }
}
