use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::licensing::LicenseStore;
use crate::models::StorableLicense;

use super::{queries, DbPool};

/// [`LicenseStore`] backed by the SQLite pool.
#[derive(Clone)]
pub struct SqliteLicenseStore {
    pool: DbPool,
}

impl SqliteLicenseStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl LicenseStore for SqliteLicenseStore {
    fn create(&self, license: &StorableLicense) -> Result<()> {
        let conn = self.pool.get()?;
        queries::create_license(&conn, license)
    }

    fn get(&self, org_id: Uuid, license_id: Uuid) -> Result<StorableLicense> {
        let conn = self.pool.get()?;
        queries::get_license(&conn, org_id, license_id)?.ok_or_else(|| {
            AppError::NotFound(format!(
                "license {} not found for organization {}",
                license_id, org_id
            ))
        })
    }

    fn get_all(&self, org_id: Uuid) -> Result<Vec<StorableLicense>> {
        let conn = self.pool.get()?;
        queries::list_licenses_for_org(&conn, org_id)
    }

    fn update(&self, org_id: Uuid, license: &StorableLicense) -> Result<()> {
        let conn = self.pool.get()?;
        if !queries::update_license(&conn, org_id, license)? {
            return Err(AppError::NotFound(format!(
                "license {} not found for organization {}",
                license.id, org_id
            )));
        }
        Ok(())
    }
}
