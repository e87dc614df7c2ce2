//! Street-slot occupancy reports and rate administration.

use park_server::db::DbService;
use park_server::db::repository::{RepoError, rate, street_slot};
use tempfile::TempDir;

async fn test_db() -> (DbService, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("test.db");
    let db = DbService::new(&path.to_string_lossy())
        .await
        .expect("Failed to open test database");
    (db, dir)
}

#[tokio::test]
async fn street_listing_is_ordered_by_display_number() {
    let (db, _dir) = test_db().await;

    let slots = street_slot::find_all(&db.pool).await.unwrap();
    let numbers: Vec<&str> = slots.iter().map(|s| s.slot_number.as_str()).collect();
    assert_eq!(numbers, vec!["A1", "A2", "A3", "B1", "B2", "B3"]);
    assert!(slots.iter().all(|s| !s.occupied));
}

#[tokio::test]
async fn sensor_report_flips_occupancy() {
    let (db, _dir) = test_db().await;

    let updated = street_slot::set_occupancy(&db.pool, "A1", true).await.unwrap();
    assert!(updated.occupied);

    let listed = street_slot::find_all(&db.pool).await.unwrap();
    let a1 = listed.iter().find(|s| s.slot_number == "A1").unwrap();
    assert!(a1.occupied);
    assert_eq!(a1.last_updated, updated.last_updated);

    let released = street_slot::set_occupancy(&db.pool, "A1", false).await.unwrap();
    assert!(!released.occupied);
}

#[tokio::test]
async fn sensor_report_for_unknown_slot_is_not_found() {
    let (db, _dir) = test_db().await;

    let err = street_slot::set_occupancy(&db.pool, "Z9", true).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn seeded_rate_is_the_default() {
    let (db, _dir) = test_db().await;

    let current = rate::current(&db.pool).await.unwrap().unwrap();
    assert_eq!(current.rate_per_hour, 50.0);
    assert!(current.is_active);
}

#[tokio::test]
async fn rate_update_mutates_the_canonical_row() {
    let (db, _dir) = test_db().await;

    let updated = rate::update_current(&db.pool, 75.5).await.unwrap();
    assert_eq!(updated.rate_per_hour, 75.5);

    let reread = rate::current(&db.pool).await.unwrap().unwrap();
    assert_eq!(reread.rate_per_hour, 75.5);
    assert_eq!(reread.id, updated.id);
}

#[tokio::test]
async fn negative_rate_is_rejected() {
    let (db, _dir) = test_db().await;

    let err = rate::update_current(&db.pool, -5.0).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let unchanged = rate::current(&db.pool).await.unwrap().unwrap();
    assert_eq!(unchanged.rate_per_hour, 50.0);
}
