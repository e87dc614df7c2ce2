//! Storage backend selection: durable and in-memory run the same
//! migrations and repository code.

use park_server::booking::engine;
use park_server::db::{DbService, StorageMode};
use park_server::db::repository::{booking, slot};
use shared::models::{BookingKind, BookingRequest};
use tempfile::TempDir;

fn walkin_request(name: &str) -> BookingRequest {
    BookingRequest {
        user_name: name.into(),
        vehicle_number: "MH03EF9012".into(),
        phone_number: "9876543212".into(),
        arrival_time: None,
    }
}

#[tokio::test]
async fn in_memory_backend_is_fully_provisioned() {
    let db = DbService::in_memory().await.unwrap();
    assert_eq!(db.mode, StorageMode::Memory);

    let counts = slot::aggregate_counts(&db.pool).await.unwrap();
    assert_eq!(counts.total, 51);
    assert_eq!(counts.available, 51);

    // Same transactional path as the durable backend
    let allocation = engine::allocate(&db.pool, BookingKind::Walkin, &walkin_request("Jane"))
        .await
        .unwrap();
    assert_eq!(allocation.slot.slot_number, "101");
}

#[tokio::test]
async fn durable_backend_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("park.db");
    let path_str = path.to_string_lossy().to_string();

    let db = DbService::new(&path_str).await.unwrap();
    assert_eq!(db.mode, StorageMode::Durable);
    let allocation = engine::allocate(&db.pool, BookingKind::Walkin, &walkin_request("Jane"))
        .await
        .unwrap();
    db.pool.close().await;

    let reopened = DbService::new(&path_str).await.unwrap();
    let listed = booking::list_with_slots(&reopened.pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, allocation.booking.id);
    assert_eq!(listed[0].slot_number, allocation.slot.slot_number);
}
