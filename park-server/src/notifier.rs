//! Change Notifier
//!
//! After any state-affecting operation, recomputes the aggregate
//! availability and the full booking/street listings, and pushes the three
//! snapshots to every connected observer. Always full snapshots — observers
//! reconcile by replacing their local view wholesale.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db::repository::{booking, slot, street_slot};
use crate::message::{BusMessage, MessageBus};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct Notifier {
    pool: SqlitePool,
    bus: Arc<MessageBus>,
}

impl Notifier {
    pub fn new(pool: SqlitePool, bus: Arc<MessageBus>) -> Self {
        Self { pool, bus }
    }

    /// Publish fresh full snapshots to all observers.
    ///
    /// Best-effort: a failed publish is logged, never surfaced to the
    /// mutation that triggered it (the mutation has already committed).
    pub async fn publish(&self) {
        if let Err(e) = self.publish_inner().await {
            tracing::warn!("Snapshot publish failed: {}", e);
        }
    }

    async fn publish_inner(&self) -> AppResult<()> {
        // 紧接提交后连续读取，三份快照彼此一致
        let availability = slot::aggregate_counts(&self.pool).await?;
        let bookings = booking::list_with_slots(&self.pool).await?;
        let street = street_slot::find_all(&self.pool).await?;

        self.bus.publish(
            BusMessage::availability(&availability)
                .map_err(|e| AppError::internal(e.to_string()))?,
        );
        self.bus.publish(
            BusMessage::bookings(&bookings).map_err(|e| AppError::internal(e.to_string()))?,
        );
        self.bus.publish(
            BusMessage::street_slots(&street).map_err(|e| AppError::internal(e.to_string()))?,
        );

        tracing::debug!(
            observers = self.bus.connected_observers(),
            "Snapshots published"
        );
        Ok(())
    }
}
