//! Test utilities and fixtures for licensing integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use serde_json::json;
use uuid::Uuid;

pub use licensing::catalog::FeatureCatalog;
pub use licensing::db::{init_db, queries, AppState, DbPool, SqliteLicenseStore};
pub use licensing::error::{AppError, Result};
pub use licensing::flagger::{StaticFlagger, USE_SPAN_METRICS};
pub use licensing::licensing::{parse, LicenseStore, Licensing};
pub use licensing::models::*;
pub use licensing::upstream::Upstream;

pub const ONE_DAY: i64 = 86400;

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// In-memory pool. A single connection so every checkout sees the same database.
pub fn test_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }
    pool
}

/// Get the current timestamp
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn future_timestamp(days: i64) -> i64 {
    now() + days * ONE_DAY
}

pub fn past_timestamp(days: i64) -> i64 {
    now() - days * ONE_DAY
}

/// Upstream license payload with the given key and validity window
pub fn license_payload(key: &str, valid_from: i64, valid_until: i64) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": Uuid::new_v4().to_string(),
        "key": key,
        "status": "ACTIVE",
        "state": "active",
        "plan": { "name": "ENTERPRISE" },
        "valid_from": valid_from,
        "valid_until": valid_until,
    }))
    .unwrap()
}

/// Storable row for `org_id` built through the parser
pub fn test_storable(org_id: Uuid, key: &str, valid_from: i64, valid_until: i64) -> StorableLicense {
    let license = parse(
        &license_payload(key, valid_from, valid_until),
        org_id,
        &FeatureCatalog::cloud(),
    )
    .expect("Failed to parse test payload");
    StorableLicense::from(&license)
}

/// Upstream double: serves registered payloads and records the keys it was called with.
#[derive(Default)]
pub struct MockUpstream {
    licenses: Mutex<HashMap<String, Vec<u8>>>,
    pub seen_keys: Mutex<Vec<String>>,
    pub redirect: String,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self {
            redirect: "https://billing.test/session".to_string(),
            ..Default::default()
        }
    }

    pub fn with_license(self, key: &str, payload: Vec<u8>) -> Self {
        self.licenses.lock().unwrap().insert(key.to_string(), payload);
        self
    }

    fn record(&self, key: &str) {
        self.seen_keys.lock().unwrap().push(key.to_string());
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn get_license(&self, key: &str) -> Result<Vec<u8>> {
        self.record(key);
        self.licenses
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::NotFound("not found".into()))
    }

    async fn get_checkout_url(&self, key: &str, _body: &[u8]) -> Result<Vec<u8>> {
        self.record(key);
        if key.is_empty() {
            return Err(AppError::Unauthenticated("unauthenticated".into()));
        }
        Ok(serde_json::to_vec(&json!({ "url": self.redirect })).unwrap())
    }

    async fn get_portal_url(&self, key: &str, _body: &[u8]) -> Result<Vec<u8>> {
        self.record(key);
        if key.is_empty() {
            return Err(AppError::Unauthenticated("unauthenticated".into()));
        }
        Ok(serde_json::to_vec(&json!({ "url": format!("{}/portal", self.redirect) })).unwrap())
    }
}

/// Store whose writes always fail, for checking activation never half-succeeds.
pub struct ReadOnlyStore;

impl LicenseStore for ReadOnlyStore {
    fn create(&self, _license: &StorableLicense) -> Result<()> {
        Err(AppError::Internal("store is read-only".into()))
    }

    fn get(&self, org_id: Uuid, license_id: Uuid) -> Result<StorableLicense> {
        Err(AppError::NotFound(format!("{} / {}", org_id, license_id)))
    }

    fn get_all(&self, _org_id: Uuid) -> Result<Vec<StorableLicense>> {
        Ok(Vec::new())
    }

    fn update(&self, _org_id: Uuid, _license: &StorableLicense) -> Result<()> {
        Err(AppError::Internal("store is read-only".into()))
    }
}

/// Licensing facade over a SQLite pool and the given upstream
pub fn test_licensing(pool: &DbPool, upstream: Arc<dyn Upstream>) -> Licensing {
    Licensing::new(
        Arc::new(SqliteLicenseStore::new(pool.clone())),
        upstream,
        Arc::new(StaticFlagger::new()),
        FeatureCatalog::cloud(),
    )
}
