mod from_row;
mod schema;
mod store;
pub mod queries;

pub use schema::init_db;
pub use store::SqliteLicenseStore;

use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::licensing::Licensing;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state shared by the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// License database pool
    pub db: DbPool,
    /// Entitlement resolution over the same database
    pub licensing: Arc<Licensing>,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    Pool::builder().max_size(10).build(manager)
}
