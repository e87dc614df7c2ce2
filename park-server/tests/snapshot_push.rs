//! Snapshot broadcast: every mutation publishes fresh full snapshots, and a
//! (re)connecting observer gets them on handshake.

use std::sync::Arc;

use park_server::booking::engine;
use park_server::db::DbService;
use park_server::message::{
    BusMessage, EventType, HandshakePayload, MessageBus, MessageHandler, Transport,
};
use park_server::notifier::Notifier;
use shared::models::{Availability, BookingKind, BookingRequest, BookingWithSlot, StreetSlot};
use tempfile::TempDir;

async fn test_db() -> (DbService, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("test.db");
    let db = DbService::new(&path.to_string_lossy())
        .await
        .expect("Failed to open test database");
    (db, dir)
}

fn walkin_request(name: &str) -> BookingRequest {
    BookingRequest {
        user_name: name.into(),
        vehicle_number: "MH02CD5678".into(),
        phone_number: "9876543211".into(),
        arrival_time: None,
    }
}

#[tokio::test]
async fn publish_delivers_three_consistent_snapshots() {
    let (db, _dir) = test_db().await;
    let bus = Arc::new(MessageBus::new());
    let notifier = Notifier::new(db.pool.clone(), bus.clone());

    // Observer subscribes before the mutation
    let observer = bus.memory_transport();

    engine::allocate(&db.pool, BookingKind::Walkin, &walkin_request("Jane"))
        .await
        .unwrap();
    notifier.publish().await;

    let availability_msg = observer.read_message().await.unwrap();
    assert_eq!(availability_msg.event_type, EventType::Availability);
    let availability: Availability = availability_msg.decode().unwrap();
    assert_eq!(availability.total, 51);
    assert_eq!(availability.occupied, 1);
    assert_eq!(availability.available, 50);

    let bookings_msg = observer.read_message().await.unwrap();
    assert_eq!(bookings_msg.event_type, EventType::Bookings);
    let bookings: Vec<BookingWithSlot> = bookings_msg.decode().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].user_name, "Jane");

    let street_msg = observer.read_message().await.unwrap();
    assert_eq!(street_msg.event_type, EventType::StreetSlots);
    let street: Vec<StreetSlot> = street_msg.decode().unwrap();
    assert_eq!(street.len(), 6);
}

#[tokio::test]
async fn handshake_triggers_a_fresh_snapshot_resend() {
    let (db, _dir) = test_db().await;
    let bus = Arc::new(MessageBus::new());
    let notifier = Notifier::new(db.pool.clone(), bus.clone());

    let handler = MessageHandler::new(
        bus.subscribe_to_clients(),
        bus.shutdown_token().clone(),
        notifier,
    );
    tokio::spawn(async move {
        handler.run().await;
    });

    // A connecting observer announces itself
    let observer = bus.client_memory_transport();
    let hello = BusMessage::handshake(&HandshakePayload::default()).unwrap();
    observer.write_message(&hello).await.unwrap();

    // ...and receives the current full snapshots without any mutation
    let first = observer.read_message().await.unwrap();
    assert_eq!(first.event_type, EventType::Availability);
    let availability: Availability = first.decode().unwrap();
    assert_eq!(availability.total, 51);
    assert_eq!(availability.available, 51);

    let second = observer.read_message().await.unwrap();
    assert_eq!(second.event_type, EventType::Bookings);
    let third = observer.read_message().await.unwrap();
    assert_eq!(third.event_type, EventType::StreetSlots);

    bus.shutdown();
}
