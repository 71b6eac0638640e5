use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sent_links (
            link TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS keywords (
            word TEXT PRIMARY KEY,
            type TEXT NOT NULL CHECK (type IN ('include', 'exclude'))
        );

        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Stores that already hold keywords were seeded before the marker existed
        INSERT OR IGNORE INTO meta (key, value)
            SELECT 'keywords_seeded', '1' WHERE EXISTS (SELECT 1 FROM keywords);
        "
    ).map_err(|e| DomainError::Persistence(format!("Migration failed: {e}")))
}
