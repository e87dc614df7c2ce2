//! Server Implementation
//!
//! HTTP 服务器启动和管理

use crate::api;
use crate::core::{Config, ServerState};
use crate::utils::AppError;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for sharing with tests)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // Start background tasks
        state.start_background_tasks();

        // Start Message Bus TCP server
        let bus = state.message_bus.clone();
        tokio::spawn(async move {
            if let Err(e) = bus.start_tcp_server().await {
                tracing::error!("Message bus TCP server failed: {}", e);
            }
        });

        let app = api::router(state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🅿️ Park Edge Server starting on {}", addr);
        tracing::info!(
            "  HTTP API     : http://localhost:{}",
            self.config.http_port
        );
        tracing::info!(
            "  Message Bus  : tcp://localhost:{}",
            self.config.message_tcp_port
        );
        tracing::info!("  Storage      : {:?}", state.storage_mode());

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        let shutdown_bus = state.message_bus.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                shutdown_bus.shutdown();
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        Ok(())
    }
}
