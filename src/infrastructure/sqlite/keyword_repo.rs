use super::{lock, SharedConnection};
use crate::domain::error::DomainError;
use crate::domain::ports::keyword_repository::{KeywordRepository, StoredKeyword};
use crate::domain::values::keyword_kind::KeywordKind;
use rusqlite::params;
use tracing::warn;

const SEEDED_KEY: &str = "keywords_seeded";

pub struct SqliteKeywordRepo {
    conn: SharedConnection,
}

impl SqliteKeywordRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn row_to_keyword(row: &rusqlite::Row) -> Result<Option<StoredKeyword>, rusqlite::Error> {
        let word: String = row.get(0)?;
        let kind_str: String = row.get(1)?;
        match kind_str.parse::<KeywordKind>() {
            Ok(kind) => Ok(Some(StoredKeyword { word, kind })),
            Err(e) => {
                warn!(word = %word, error = %e, "Skipping keyword with invalid type");
                Ok(None)
            }
        }
    }
}

impl KeywordRepository for SqliteKeywordRepo {
    fn upsert(&self, word: &str, kind: KeywordKind) -> Result<(), DomainError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO keywords (word, type) VALUES (?1, ?2)
             ON CONFLICT(word) DO UPDATE SET type = excluded.type",
            params![word, kind.to_string()],
        )
        .map_err(|e| DomainError::Persistence(format!("Failed to save keyword: {e}")))?;
        Ok(())
    }

    fn remove(&self, word: &str) -> Result<bool, DomainError> {
        let conn = lock(&self.conn)?;
        let rows = conn
            .execute("DELETE FROM keywords WHERE word = ?1", params![word])
            .map_err(|e| DomainError::Persistence(format!("Failed to remove keyword: {e}")))?;
        Ok(rows > 0)
    }

    fn list(&self) -> Result<Vec<StoredKeyword>, DomainError> {
        let conn = lock(&self.conn)?;
        // rowid follows insertion order; an upsert keeps the original row
        let mut stmt = conn.prepare("SELECT word, type FROM keywords ORDER BY rowid")?;
        let keywords = stmt
            .query_map([], Self::row_to_keyword)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect();
        Ok(keywords)
    }

    fn is_seeded(&self) -> Result<bool, DomainError> {
        let conn = lock(&self.conn)?;
        let found: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM meta WHERE key = ?1)",
            params![SEEDED_KEY],
            |row| row.get(0),
        )?;
        Ok(found != 0)
    }

    fn mark_seeded(&self) -> Result<(), DomainError> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, '1')",
            params![SEEDED_KEY],
        )
        .map_err(|e| DomainError::Persistence(format!("Failed to mark keywords seeded: {e}")))?;
        Ok(())
    }
}
