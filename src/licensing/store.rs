use uuid::Uuid;

use crate::error::Result;
use crate::models::StorableLicense;

/// Persistence contract for license rows.
///
/// Rows are append-only per activation; `update` refreshes data and
/// timestamps of an existing row without touching its identity. `get_all`
/// makes no ordering promise.
pub trait LicenseStore: Send + Sync {
    /// Insert a new row. A duplicate key fails with `AppError::Conflict`.
    fn create(&self, license: &StorableLicense) -> Result<()>;

    /// Fails with `AppError::NotFound` when the row does not exist for `org_id`.
    fn get(&self, org_id: Uuid, license_id: Uuid) -> Result<StorableLicense>;

    fn get_all(&self, org_id: Uuid) -> Result<Vec<StorableLicense>>;

    fn update(&self, org_id: Uuid, license: &StorableLicense) -> Result<()>;
}
