use crate::domain::error::DomainError;
use crate::domain::values::keyword_kind::KeywordKind;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoredKeyword {
    pub word: String,
    pub kind: KeywordKind,
}

pub trait KeywordRepository: Send + Sync {
    /// Upsert a word. A word holds exactly one role; re-adding it with a
    /// different kind moves it.
    fn upsert(&self, word: &str, kind: KeywordKind) -> Result<(), DomainError>;
    /// Returns whether a row was removed.
    fn remove(&self, word: &str) -> Result<bool, DomainError>;
    /// All keywords in insertion order.
    fn list(&self) -> Result<Vec<StoredKeyword>, DomainError>;
    /// Whether the initial keyword lists have ever been written.
    fn is_seeded(&self) -> Result<bool, DomainError>;
    fn mark_seeded(&self) -> Result<(), DomainError>;
}
