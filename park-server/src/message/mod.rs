//! Transport layer abstraction for the message bus
//!
//! Provides a pluggable transport layer architecture:
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           MessageBus                     │
//! │  ┌───────────────────────────────────┐  │
//! │  │  broadcast::Sender<BusMessage>    │  │
//! │  └───────────────────────────────────┘  │
//! └────────────────┬────────────────────────┘
//!                  │
//!         ┌────────┴────────┐
//!         │ Transport Trait │  ◄── 可插拔
//!         └────────┬────────┘
//!                  │
//!          ┌───────┴───────┐
//!          ▼               ▼
//!    TcpTransport    MemoryTransport
//!    (TCP)           (同进程)
//! ```
//!
//! Wire frame: event-type byte, 4-byte LE payload length, JSON payload.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::sync::broadcast;

pub mod bus;
pub mod handler;

pub use bus::{MessageBus, TransportConfig};
pub use handler::MessageHandler;
pub use shared::message::{BusMessage, EventType, HandshakePayload};

use crate::utils::AppError;

// ========== Transport Trait ==========

#[async_trait]
pub trait Transport: Send + Sync {
    async fn read_message(&self) -> Result<BusMessage, AppError>;
    async fn write_message(&self, msg: &BusMessage) -> Result<(), AppError>;
}

// Helper functions
async fn read_from_stream<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<BusMessage, AppError> {
    // Read event type (1 byte)
    let mut type_buf = [0u8; 1];
    reader
        .read_exact(&mut type_buf)
        .await
        .map_err(|e| AppError::internal(format!("Read type failed: {}", e)))?;

    let event_type = EventType::try_from(type_buf[0])
        .map_err(|_| AppError::validation("Invalid event type"))?;

    // Read payload length (4 bytes)
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| AppError::internal(format!("Read len failed: {}", e)))?;

    let len = u32::from_le_bytes(len_buf) as usize;

    // Read payload
    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| AppError::internal(format!("Read payload failed: {}", e)))?;

    Ok(BusMessage::new(event_type, payload))
}

async fn write_to_stream<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    msg: &BusMessage,
) -> Result<(), AppError> {
    let mut data = Vec::new();
    data.push(msg.event_type as u8);
    data.extend_from_slice(&(msg.payload.len() as u32).to_le_bytes());
    data.extend_from_slice(&msg.payload);

    writer
        .write_all(&data)
        .await
        .map_err(|e| AppError::internal(format!("Write failed: {}", e)))?;
    Ok(())
}

// ========== TCP Transport ==========

/// TCP transport implementation
#[derive(Debug)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, AppError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| AppError::internal(format!("TCP connect failed: {}", e)))?;
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read_message(&self) -> Result<BusMessage, AppError> {
        let mut reader = self.reader.lock().await;
        read_from_stream(&mut *reader).await
    }

    async fn write_message(&self, msg: &BusMessage) -> Result<(), AppError> {
        let mut writer = self.writer.lock().await;
        write_to_stream(&mut *writer, msg).await
    }
}

// ========== Memory Transport (In-Process) ==========

/// In-process memory transport for same-process communication
///
/// Uses the bus broadcast channel internally for zero-copy messaging.
#[derive(Debug)]
pub struct MemoryTransport {
    rx: Arc<Mutex<broadcast::Receiver<BusMessage>>>,
    tx: Option<broadcast::Sender<BusMessage>>,
}

impl MemoryTransport {
    /// Create from a message bus sender (for receiving broadcasts)
    pub fn new(tx: &broadcast::Sender<BusMessage>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(tx.subscribe())),
            tx: None,
        }
    }

    /// Create with client sender for simulating client messages
    pub fn with_client_sender(
        broadcast_tx: &broadcast::Sender<BusMessage>,
        client_tx: &broadcast::Sender<BusMessage>,
    ) -> Self {
        Self {
            rx: Arc::new(Mutex::new(broadcast_tx.subscribe())),
            tx: Some(client_tx.clone()),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn read_message(&self) -> Result<BusMessage, AppError> {
        let mut rx = self.rx.lock().await;
        rx.recv()
            .await
            .map_err(|e| AppError::internal(e.to_string()))
    }

    async fn write_message(&self, msg: &BusMessage) -> Result<(), AppError> {
        // Send to server via client_tx (for simulating client messages)
        if let Some(tx) = &self.tx {
            tx.send(msg.clone())
                .map_err(|e| AppError::internal(e.to_string()))?;
        }
        Ok(())
    }
}
