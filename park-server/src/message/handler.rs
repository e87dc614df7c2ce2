//! Message Handler for server-side message processing
//!
//! Subscribes to the client channel of the bus. The only client-originated
//! message in this protocol is the handshake: a (re)connecting observer
//! announces itself and the handler answers by re-publishing the current
//! full snapshots, so the observer starts from fresh state instead of
//! waiting for the next mutation.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::message::{BusMessage, EventType, HandshakePayload};
use crate::notifier::Notifier;
use shared::message::PROTOCOL_VERSION;

/// Server-side message handler
///
/// Long-running task, spawned in the background at startup.
pub struct MessageHandler {
    receiver: broadcast::Receiver<BusMessage>,
    shutdown_token: CancellationToken,
    notifier: Notifier,
}

impl MessageHandler {
    pub fn new(
        receiver: broadcast::Receiver<BusMessage>,
        shutdown_token: CancellationToken,
        notifier: Notifier,
    ) -> Self {
        Self {
            receiver,
            shutdown_token,
            notifier,
        }
    }

    /// Start processing messages
    pub async fn run(mut self) {
        tracing::info!("🎯 Message handler started");

        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Message handler shutting down");
                    break;
                }

                msg_result = self.receiver.recv() => {
                    match msg_result {
                        Ok(msg) => self.handle_message(&msg).await,
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!("Message handler lagged, skipped {} messages", n);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Client channel closed, message handler stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn handle_message(&self, msg: &BusMessage) {
        match msg.event_type {
            EventType::Handshake => {
                match msg.decode::<HandshakePayload>() {
                    Ok(hello) => {
                        if hello.version != PROTOCOL_VERSION {
                            tracing::warn!(
                                client = hello.client_name.as_deref().unwrap_or("unknown"),
                                version = hello.version,
                                "Observer handshake with mismatched protocol version"
                            );
                        }
                        tracing::debug!(
                            client = hello.client_name.as_deref().unwrap_or("unknown"),
                            "Observer handshake, sending fresh snapshots"
                        );
                    }
                    Err(e) => {
                        tracing::warn!("Malformed handshake payload: {}", e);
                    }
                }
                // Snapshots are broadcast: idempotent for everyone else
                self.notifier.publish().await;
            }
            other => {
                tracing::debug!("Ignoring client message of type {}", other);
            }
        }
    }
}
