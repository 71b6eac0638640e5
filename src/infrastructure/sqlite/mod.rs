pub mod keyword_repo;
pub mod migrations;
pub mod sent_link_repo;

use crate::domain::error::DomainError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// The single SQLite connection shared by every repository in the process.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Open the store at `path` (or `:memory:`), apply migrations and wrap the
/// connection for sharing.
pub fn open(path: &str) -> Result<SharedConnection, DomainError> {
    let conn = Connection::open(path)
        .map_err(|e| DomainError::Persistence(format!("Failed to open {path}: {e}")))?;
    if path != ":memory:" {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Persistence(format!("WAL error: {e}")))?;
    }
    migrations::run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub(crate) fn lock(
    conn: &SharedConnection,
) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
    conn.lock()
        .map_err(|e| DomainError::Persistence(e.to_string()))
}
