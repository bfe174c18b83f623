use rusqlite::Connection;

/// Initialize the license schema
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- One row per activation; an organization accumulates history.
        -- key is unique across all organizations so a key activates once.
        CREATE TABLE IF NOT EXISTS licenses (
            id TEXT PRIMARY KEY,
            key TEXT NOT NULL UNIQUE,
            data TEXT NOT NULL,
            last_validated_at INTEGER NOT NULL,
            org_id TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_licenses_org ON licenses(org_id);
        "#,
    )
}
