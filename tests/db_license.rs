//! Database license operation tests

mod common;

use common::*;
use uuid::Uuid;

// ============ Queries ============

#[test]
fn test_create_and_get_license() {
    let conn = setup_test_db();
    let org_id = Uuid::new_v4();
    let storable = test_storable(org_id, "key-1", now(), -1);

    queries::create_license(&conn, &storable).expect("create should succeed");

    let fetched = queries::get_license(&conn, org_id, storable.id)
        .expect("Query failed")
        .expect("License not found");

    assert_eq!(fetched, storable, "stored row should round-trip unchanged");
}

#[test]
fn test_get_license_scoped_to_org() {
    let conn = setup_test_db();
    let storable = test_storable(Uuid::new_v4(), "key-1", now(), -1);
    queries::create_license(&conn, &storable).unwrap();

    let other_org = queries::get_license(&conn, Uuid::new_v4(), storable.id).unwrap();
    assert!(other_org.is_none(), "another organization must not see the row");
}

#[test]
fn test_duplicate_key_is_conflict() {
    let conn = setup_test_db();
    let first = test_storable(Uuid::new_v4(), "shared-key", now(), -1);
    let second = test_storable(Uuid::new_v4(), "shared-key", now(), -1);

    queries::create_license(&conn, &first).unwrap();
    let err = queries::create_license(&conn, &second).unwrap_err();

    assert!(
        matches!(err, AppError::Conflict(_)),
        "duplicate key across organizations should conflict, got: {}",
        err
    );
}

#[test]
fn test_list_licenses_for_org() {
    let conn = setup_test_db();
    let org_id = Uuid::new_v4();
    for i in 0..3 {
        let storable = test_storable(org_id, &format!("key-{}", i), now() - i, -1);
        queries::create_license(&conn, &storable).unwrap();
    }
    queries::create_license(&conn, &test_storable(Uuid::new_v4(), "elsewhere", now(), -1))
        .unwrap();

    let rows = queries::list_licenses_for_org(&conn, org_id).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(queries::count_licenses_for_org(&conn, org_id).unwrap(), 3);
    assert!(rows.iter().all(|r| r.org_id == org_id));
}

#[test]
fn test_list_licenses_empty_org() {
    let conn = setup_test_db();
    assert!(queries::list_licenses_for_org(&conn, Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn test_update_license_refreshes_data() {
    let conn = setup_test_db();
    let org_id = Uuid::new_v4();
    let mut storable = test_storable(org_id, "key-1", now(), -1);
    queries::create_license(&conn, &storable).unwrap();

    storable
        .data
        .insert("state".to_string(), serde_json::json!("suspended"));
    storable.last_validated_at = future_timestamp(1);
    assert!(queries::update_license(&conn, org_id, &storable).unwrap());

    let fetched = queries::get_license(&conn, org_id, storable.id).unwrap().unwrap();
    assert_eq!(fetched.data["state"], "suspended");
    assert_eq!(fetched.last_validated_at, storable.last_validated_at);
    assert_eq!(fetched.key, storable.key, "update must not change identity");
    assert_eq!(fetched.created_at, storable.created_at);
}

#[test]
fn test_update_missing_license_returns_false() {
    let conn = setup_test_db();
    let storable = test_storable(Uuid::new_v4(), "key-1", now(), -1);

    assert!(!queries::update_license(&conn, storable.org_id, &storable).unwrap());
}

// ============ SqliteLicenseStore ============

#[test]
fn test_store_get_missing_is_not_found() {
    let store = SqliteLicenseStore::new(test_pool());

    let err = store.get(Uuid::new_v4(), Uuid::new_v4()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_store_update_missing_is_not_found() {
    let store = SqliteLicenseStore::new(test_pool());
    let storable = test_storable(Uuid::new_v4(), "key-1", now(), -1);

    let err = store.update(storable.org_id, &storable).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_store_round_trip_through_parser() {
    let store = SqliteLicenseStore::new(test_pool());
    let org_id = Uuid::new_v4();
    let catalog = FeatureCatalog::cloud();
    let license = parse(&license_payload("key-1", 100, 200), org_id, &catalog).unwrap();

    store.create(&StorableLicense::from(&license)).unwrap();
    let stored = store.get(org_id, license.id).unwrap();
    let restored = licensing::licensing::parse_stored(stored, &catalog).unwrap();

    assert_eq!(restored.plan_name, license.plan_name);
    assert_eq!(restored.valid_from, 100);
    assert_eq!(restored.valid_until, 200);
    assert_eq!(restored.features, catalog.to_vec());
    assert!(!restored.data.contains_key("key"));
    assert!(!restored.data.contains_key("id"));
}

#[test]
fn test_store_update_after_license_update() {
    let store = SqliteLicenseStore::new(test_pool());
    let org_id = Uuid::new_v4();
    let catalog = FeatureCatalog::cloud();
    let mut license = parse(&license_payload("key-1", 100, -1), org_id, &catalog).unwrap();
    store.create(&StorableLicense::from(&license)).unwrap();

    let mut renewed: serde_json::Value =
        serde_json::from_slice(&license_payload("key-1", 100, 999)).unwrap();
    renewed["id"] = serde_json::json!(license.id.to_string());
    license
        .update(&serde_json::to_vec(&renewed).unwrap(), &catalog)
        .unwrap();
    store.update(org_id, &StorableLicense::from(&license)).unwrap();

    let all = store.get_all(org_id).unwrap();
    assert_eq!(all.len(), 1, "update must not insert a new row");
    assert_eq!(all[0].data["valid_until"], 999);
}
