use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::StorableLicense;

use super::from_row::{query_all, query_one, LICENSE_COLS};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

// ============ Licenses ============

/// Insert a license row. A key (or id) that already exists is a conflict.
pub fn create_license(conn: &Connection, license: &StorableLicense) -> Result<()> {
    let data = serde_json::to_string(&license.data)?;

    let result = conn.execute(
        "INSERT INTO licenses (id, key, data, last_validated_at, org_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            license.id.to_string(),
            &license.key,
            data,
            license.last_validated_at,
            license.org_id.to_string(),
            license.created_at,
            license.updated_at,
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
            "license with this key has already been activated".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub fn get_license(
    conn: &Connection,
    org_id: Uuid,
    license_id: Uuid,
) -> Result<Option<StorableLicense>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM licenses WHERE org_id = ?1 AND id = ?2",
            LICENSE_COLS
        ),
        &[&org_id.to_string(), &license_id.to_string()],
    )
}

/// All license rows for an organization. Ordering is not part of the contract.
pub fn list_licenses_for_org(conn: &Connection, org_id: Uuid) -> Result<Vec<StorableLicense>> {
    query_all(
        conn,
        &format!("SELECT {} FROM licenses WHERE org_id = ?1", LICENSE_COLS),
        &[&org_id.to_string()],
    )
}

/// Refresh data and validation time of an existing row. `updated_at` is
/// stamped here. Returns false if no row matched.
pub fn update_license(conn: &Connection, org_id: Uuid, license: &StorableLicense) -> Result<bool> {
    let data = serde_json::to_string(&license.data)?;

    let affected = conn.execute(
        "UPDATE licenses SET data = ?1, last_validated_at = ?2, updated_at = ?3
         WHERE id = ?4 AND org_id = ?5",
        params![
            data,
            license.last_validated_at,
            now(),
            license.id.to_string(),
            org_id.to_string(),
        ],
    )?;
    Ok(affected > 0)
}

pub fn count_licenses_for_org(conn: &Connection, org_id: Uuid) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM licenses WHERE org_id = ?1",
        [org_id.to_string()],
        |row| row.get(0),
    )
    .map_err(Into::into)
}
