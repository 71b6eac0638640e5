use super::{lock, SharedConnection};
use crate::domain::error::DomainError;
use crate::domain::ports::sent_link_repository::SentLinkRepository;
use rusqlite::params;

pub struct SqliteSentLinkRepo {
    conn: SharedConnection,
}

impl SqliteSentLinkRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl SentLinkRepository for SqliteSentLinkRepo {
    fn insert(&self, link: &str) -> Result<(), DomainError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT OR IGNORE INTO sent_links (link) VALUES (?1)",
            params![link],
        )
        .map_err(|e| DomainError::Persistence(format!("Failed to record sent link: {e}")))?;
        Ok(())
    }

    fn contains(&self, link: &str) -> Result<bool, DomainError> {
        let conn = lock(&self.conn)?;
        let found: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sent_links WHERE link = ?1)",
            params![link],
            |row| row.get(0),
        )?;
        Ok(found != 0)
    }

    fn load_all(&self) -> Result<Vec<String>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT link FROM sent_links")?;
        let links = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    fn count(&self) -> Result<usize, DomainError> {
        let conn = lock(&self.conn)?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM sent_links", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
