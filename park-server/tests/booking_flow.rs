//! End-to-end allocation and lifecycle tests against a real database.

use park_server::booking::{engine, lifecycle};
use park_server::db::DbService;
use park_server::db::repository::{RepoError, booking, slot};
use shared::models::{BookingKind, BookingRequest, PaymentStatus, SlotStatus};
use shared::util::now_millis;
use tempfile::TempDir;

async fn test_db() -> (DbService, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("test.db");
    let db = DbService::new(&path.to_string_lossy())
        .await
        .expect("Failed to open test database");
    (db, dir)
}

/// Replace the seeded facility with a small deterministic one
async fn reseed_slots(db: &DbService, slots: &[(&str, i64)]) {
    sqlx::query("DELETE FROM booking")
        .execute(&db.pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM parking_slot")
        .execute(&db.pool)
        .await
        .unwrap();
    for (number, floor) in slots {
        sqlx::query("INSERT INTO parking_slot (slot_number, floor_number) VALUES (?, ?)")
            .bind(number)
            .bind(floor)
            .execute(&db.pool)
            .await
            .unwrap();
    }
}

fn scheduled_request(name: &str) -> BookingRequest {
    BookingRequest {
        user_name: name.into(),
        vehicle_number: "MH01AB1234".into(),
        phone_number: "9876543210".into(),
        arrival_time: Some(now_millis() + 10 * 60_000),
    }
}

fn walkin_request(name: &str) -> BookingRequest {
    BookingRequest {
        user_name: name.into(),
        vehicle_number: "MH02CD5678".into(),
        phone_number: "9876543211".into(),
        arrival_time: None,
    }
}

async fn slot_status(db: &DbService, slot_id: i64) -> SlotStatus {
    sqlx::query_scalar::<_, SlotStatus>("SELECT status FROM parking_slot WHERE id = ?")
        .bind(slot_id)
        .fetch_one(&db.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn scheduled_allocation_books_the_lowest_slot() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("201", 2), ("102", 1), ("101", 1)]).await;

    let allocation = engine::allocate(&db.pool, BookingKind::Scheduled, &scheduled_request("John"))
        .await
        .unwrap();

    // Floor ascending, then display number
    assert_eq!(allocation.slot.slot_number, "101");
    assert_eq!(allocation.slot.status, SlotStatus::Booked);
    assert_eq!(allocation.booking.payment_status, PaymentStatus::Pending);
    assert_eq!(allocation.booking.kind, BookingKind::Scheduled);
    assert_eq!(allocation.booking.amount, None);
    assert_eq!(allocation.booking.departure_time, None);
    assert_eq!(slot_status(&db, allocation.slot.id).await, SlotStatus::Booked);

    let counts = slot::aggregate_counts(&db.pool).await.unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.available, 2);
    assert_eq!(counts.booked, 1);
    assert_eq!(counts.occupied, 0);
}

#[tokio::test]
async fn walkin_allocation_occupies_immediately() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("101", 1)]).await;

    let allocation = engine::allocate(&db.pool, BookingKind::Walkin, &walkin_request("Jane"))
        .await
        .unwrap();

    assert_eq!(allocation.booking.payment_status, PaymentStatus::Active);
    assert_eq!(allocation.slot.status, SlotStatus::Occupied);
    // Walk-in arrival is "now" = booking time
    assert_eq!(allocation.booking.arrival_time, allocation.booking.booking_time);

    // Facility is now full
    let err = engine::allocate(&db.pool, BookingKind::Walkin, &walkin_request("Late"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NoAvailability));
}

#[tokio::test]
async fn scheduled_arrival_window_is_enforced() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("101", 1)]).await;

    let mut past = scheduled_request("Early");
    past.arrival_time = Some(now_millis() - 60 * 60_000);
    let err = engine::allocate(&db.pool, BookingKind::Scheduled, &past)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let mut far = scheduled_request("Far");
    far.arrival_time = Some(now_millis() + 2 * 60 * 60_000);
    let err = engine::allocate(&db.pool, BookingKind::Scheduled, &far)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let mut missing = scheduled_request("Missing");
    missing.arrival_time = None;
    let err = engine::allocate(&db.pool, BookingKind::Scheduled, &missing)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Nothing was reserved by the rejected requests
    let counts = slot::aggregate_counts(&db.pool).await.unwrap();
    assert_eq!(counts.available, 1);
}

#[tokio::test]
async fn customer_fields_are_required() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("101", 1)]).await;

    let mut req = walkin_request("  ");
    req.user_name = "   ".into();
    let err = engine::allocate(&db.pool, BookingKind::Walkin, &req)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn complete_pending_booking_releases_the_slot() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("101", 1)]).await;

    let allocation = engine::allocate(&db.pool, BookingKind::Scheduled, &scheduled_request("John"))
        .await
        .unwrap();

    // pending -> completed directly: no separate arrival event is modeled
    let settled = lifecycle::complete(&db.pool, allocation.booking.id, 150.0)
        .await
        .unwrap();

    assert_eq!(settled.payment_status, PaymentStatus::Completed);
    assert_eq!(settled.amount, Some(150.0));
    assert!(settled.departure_time.is_some());
    assert_eq!(slot_status(&db, allocation.slot.id).await, SlotStatus::Available);

    let counts = slot::aggregate_counts(&db.pool).await.unwrap();
    assert_eq!(counts.available, 1);
}

#[tokio::test]
async fn complete_twice_is_rejected_without_state_change() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("101", 1)]).await;

    let allocation = engine::allocate(&db.pool, BookingKind::Walkin, &walkin_request("Jane"))
        .await
        .unwrap();
    let settled = lifecycle::complete(&db.pool, allocation.booking.id, 50.0)
        .await
        .unwrap();

    let err = lifecycle::complete(&db.pool, allocation.booking.id, 999.0)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));

    // Amount was written exactly once
    let mut conn = db.pool.acquire().await.unwrap();
    let unchanged = booking::find_by_id(&mut conn, settled.id).await.unwrap().unwrap();
    assert_eq!(unchanged.amount, Some(50.0));
    assert_eq!(unchanged.departure_time, settled.departure_time);
}

#[tokio::test]
async fn cancel_is_terminal_and_distinct_from_completed() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("101", 1)]).await;

    let allocation = engine::allocate(&db.pool, BookingKind::Scheduled, &scheduled_request("John"))
        .await
        .unwrap();

    let cancelled = lifecycle::cancel(&db.pool, allocation.booking.id).await.unwrap();
    assert_eq!(cancelled.payment_status, PaymentStatus::Cancelled);
    // No payment ever occurred
    assert_eq!(cancelled.amount, None);
    assert_eq!(cancelled.departure_time, None);
    assert_eq!(slot_status(&db, allocation.slot.id).await, SlotStatus::Available);

    // Terminal: cannot complete a cancelled booking
    let err = lifecycle::complete(&db.pool, allocation.booking.id, 50.0)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));
}

#[tokio::test]
async fn complete_unknown_booking_is_not_found() {
    let (db, _dir) = test_db().await;

    let err = lifecycle::complete(&db.pool, 123_456_789, 50.0).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn negative_amount_is_rejected() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("101", 1)]).await;

    let allocation = engine::allocate(&db.pool, BookingKind::Walkin, &walkin_request("Jane"))
        .await
        .unwrap();
    let err = lifecycle::complete(&db.pool, allocation.booking.id, -1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(slot_status(&db, allocation.slot.id).await, SlotStatus::Occupied);
}

#[tokio::test]
async fn mark_available_is_idempotent() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("101", 1)]).await;

    let slot_id: i64 = sqlx::query_scalar("SELECT id FROM parking_slot LIMIT 1")
        .fetch_one(&db.pool)
        .await
        .unwrap();

    let mut conn = db.pool.acquire().await.unwrap();
    slot::mark_available(&mut conn, slot_id).await.unwrap();
    slot::mark_available(&mut conn, slot_id).await.unwrap();
    drop(conn);

    assert_eq!(slot_status(&db, slot_id).await, SlotStatus::Available);
}

#[tokio::test]
async fn concurrent_allocations_never_oversell() {
    let (db, _dir) = test_db().await;
    reseed_slots(&db, &[("101", 1), ("102", 1)]).await;

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..6 {
        let pool = db.pool.clone();
        tasks.spawn(async move {
            engine::allocate(&pool, BookingKind::Walkin, &walkin_request(&format!("Racer {i}")))
                .await
        });
    }

    let mut won = 0;
    let mut lost = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => won += 1,
            Err(RepoError::NoAvailability) => lost += 1,
            Err(other) => panic!("Unexpected allocation error: {other}"),
        }
    }

    // Exactly K of N requests win a facility with K slots
    assert_eq!(won, 2);
    assert_eq!(lost, 4);

    let counts = slot::aggregate_counts(&db.pool).await.unwrap();
    assert_eq!(counts.available, 0);
    assert_eq!(counts.occupied, 2);

    // No slot is double-assigned
    let slot_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM parking_slot")
        .fetch_all(&db.pool)
        .await
        .unwrap();
    for slot_id in slot_ids {
        let open = booking::count_open_for_slot(&db.pool, slot_id).await.unwrap();
        assert!(open <= 1, "slot {slot_id} has {open} open bookings");
    }
}
