//! 消息总线核心实现
//!
//! # 消息流
//!
//! ```text
//! Client ──▶ write_message() ──▶ client_tx ──▶ MessageHandler
//!                                           │
//! Server ──▶ publish() ────────▶ server_tx ──┤
//!                                           ▼
//!                                    Connected Clients
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shared::message::BusMessage;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::{MemoryTransport, TcpTransport, Transport};
use crate::utils::AppError;

/// Configuration for transport layer
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tcp_listen_addr: String,
    /// Capacity of the broadcast channel (default: 1024)
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tcp_listen_addr: "0.0.0.0:8081".to_string(),
            channel_capacity: 1024,
        }
    }
}

/// 消息总线 - 负责消息路由和转发
///
/// # 职责
///
/// - 消息路由 (publish, send_to_server)
/// - 观察者管理 (connected_observers)
/// - 传输层抽象 (TCP/Memory)
#[derive(Debug)]
pub struct MessageBus {
    /// 客户端到服务器的消息通道
    client_tx: broadcast::Sender<BusMessage>,
    /// 服务器到客户端的广播通道
    server_tx: broadcast::Sender<BusMessage>,
    /// 传输层配置
    config: TransportConfig,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
    /// 当前连接的观察者数量
    observers: Arc<AtomicUsize>,
}

impl MessageBus {
    /// 创建默认配置的消息总线
    pub fn new() -> Self {
        Self::from_config(TransportConfig::default())
    }

    /// 从配置创建消息总线
    pub fn from_config(config: TransportConfig) -> Self {
        let capacity = config.channel_capacity;
        let (client_tx, _) = broadcast::channel(capacity);
        let (server_tx, _) = broadcast::channel(capacity);
        Self {
            client_tx,
            server_tx,
            config,
            shutdown_token: CancellationToken::new(),
            observers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 发布消息 (服务器 -> 所有订阅者)
    ///
    /// Fire-and-forget broadcast. 无订阅者时静默丢弃。
    pub fn publish(&self, msg: BusMessage) {
        let _ = self.server_tx.send(msg);
    }

    /// 客户端消息入站 (客户端 -> 服务器)
    pub fn send_to_server(&self, msg: BusMessage) -> Result<(), AppError> {
        self.client_tx
            .send(msg)
            .map_err(|e| AppError::internal(e.to_string()))?;
        Ok(())
    }

    /// 订阅客户端消息 (服务器侧处理器使用)
    pub fn subscribe_to_clients(&self) -> broadcast::Receiver<BusMessage> {
        self.client_tx.subscribe()
    }

    /// 订阅服务器广播 (客户端使用)
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.server_tx.subscribe()
    }

    /// Get a memory transport for in-process observers
    pub fn memory_transport(&self) -> MemoryTransport {
        MemoryTransport::new(&self.server_tx)
    }

    /// Get a client memory transport that can also send messages to server
    pub fn client_memory_transport(&self) -> MemoryTransport {
        MemoryTransport::with_client_sender(&self.server_tx, &self.client_tx)
    }

    /// 当前连接的网络观察者数量
    pub fn connected_observers(&self) -> usize {
        self.observers.load(Ordering::Relaxed)
    }

    /// Get the shutdown token (for monitoring shutdown signals)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// Gracefully shutdown the message bus
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }

    /// Start TCP server (for network observers)
    ///
    /// 1. Accepts connections
    /// 2. Reads messages from clients and publishes to client_tx
    /// 3. Forwards server broadcast messages to connected clients
    /// 4. Gracefully shuts down on cancellation signal
    pub async fn start_tcp_server(&self) -> Result<(), AppError> {
        let listener = TcpListener::bind(&self.config.tcp_listen_addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind: {}", e)))?;

        tracing::info!(
            "Message bus TCP server listening on {}",
            self.config.tcp_listen_addr
        );

        let server_tx = self.server_tx.clone();
        let client_tx = self.client_tx.clone();
        let shutdown_token = self.shutdown_token.clone();
        let observers = self.observers.clone();

        loop {
            tokio::select! {
                // Listen for shutdown signal
                _ = shutdown_token.cancelled() => {
                    tracing::info!("Message bus TCP server shutting down");
                    break;
                }

                // Accept new connections
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            tracing::info!("Observer connected: {}", addr);

                            let server_tx = server_tx.clone();
                            let client_tx = client_tx.clone();
                            let shutdown_token = shutdown_token.clone();
                            let observers = observers.clone();

                            tokio::spawn(async move {
                                observers.fetch_add(1, Ordering::Relaxed);

                                let transport = Arc::new(TcpTransport::from_stream(stream));

                                let mut rx = server_tx.subscribe();
                                let transport_clone = transport.clone();
                                let client_shutdown = shutdown_token.clone();

                                // Forward server broadcasts to this observer
                                tokio::spawn(async move {
                                    loop {
                                        tokio::select! {
                                            _ = client_shutdown.cancelled() => {
                                                break;
                                            }
                                            msg_result = rx.recv() => {
                                                match msg_result {
                                                    Ok(msg) => {
                                                        if let Err(e) = transport_clone.write_message(&msg).await {
                                                            tracing::info!("Observer {} disconnected: {}", addr, e);
                                                            break;
                                                        }
                                                    }
                                                    // Lagged: 快照是全量的，丢掉旧的继续即可
                                                    Err(broadcast::error::RecvError::Lagged(n)) => {
                                                        tracing::warn!("Observer {} lagged, skipped {} snapshots", addr, n);
                                                    }
                                                    Err(broadcast::error::RecvError::Closed) => {
                                                        break;
                                                    }
                                                }
                                            }
                                        }
                                    }
                                });

                                // Read messages from client (client → server)
                                loop {
                                    tokio::select! {
                                        _ = shutdown_token.cancelled() => {
                                            break;
                                        }
                                        read_result = transport.read_message() => {
                                            match read_result {
                                                Ok(msg) => {
                                                    if let Err(e) = client_tx.send(msg) {
                                                        tracing::warn!("Failed to publish client message: {}", e);
                                                    }
                                                }
                                                Err(e) => {
                                                    tracing::info!("Observer {} read error: {}", addr, e);
                                                    break;
                                                }
                                            }
                                        }
                                    }
                                }

                                observers.fetch_sub(1, Ordering::Relaxed);
                            });
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
