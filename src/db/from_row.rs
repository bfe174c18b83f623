//! Row mapping trait and helpers for reducing boilerplate in queries.

use rusqlite::{types::Type, Connection, OptionalExtension, Row, ToSql};
use uuid::Uuid;

use crate::models::{LicenseData, StorableLicense};

/// Parse a TEXT column holding a UUID, converting parse errors to rusqlite errors.
fn parse_uuid(row: &Row, col: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(col)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(e)))
}

/// Parse a TEXT column holding a JSON object.
fn parse_json_object(row: &Row, col: usize) -> rusqlite::Result<LicenseData> {
    let text: String = row.get(col)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(e)))
}

/// Trait for constructing a type from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub const LICENSE_COLS: &str =
    "id, key, data, last_validated_at, org_id, created_at, updated_at";

impl FromRow for StorableLicense {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(StorableLicense {
            id: parse_uuid(row, 0)?,
            key: row.get(1)?,
            data: parse_json_object(row, 2)?,
            last_validated_at: row.get(3)?,
            org_id: parse_uuid(row, 4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}
