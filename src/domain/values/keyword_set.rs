use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::ports::keyword_repository::StoredKeyword;
use crate::domain::values::keyword_kind::KeywordKind;

/// Normalise a user-supplied keyword: trimmed and lower-cased.
///
/// Empty words are rejected since an empty substring matches every posting.
pub fn normalize_keyword(word: &str) -> Result<String, DomainError> {
    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return Err(DomainError::InvalidInput("keyword must not be empty".into()));
    }
    Ok(word)
}

/// Snapshot of the include/exclude keywords, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordSet {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl KeywordSet {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn from_stored(stored: Vec<StoredKeyword>) -> Self {
        let mut set = Self::default();
        for kw in stored {
            match kw.kind {
                KeywordKind::Include => set.include.push(kw.word),
                KeywordKind::Exclude => set.exclude.push(kw.word),
            }
        }
        set
    }

    pub fn contains(&self, word: &str) -> bool {
        self.include.iter().chain(&self.exclude).any(|w| w == word)
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}
