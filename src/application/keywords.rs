use std::sync::Arc;

use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::ports::keyword_repository::KeywordRepository;
use crate::domain::values::keyword_kind::KeywordKind;
use crate::domain::values::keyword_set::{normalize_keyword, KeywordSet};

/// Runtime-editable keyword set, persisted on every mutation.
pub struct KeywordsUseCase {
    repo: Arc<dyn KeywordRepository>,
}

impl KeywordsUseCase {
    pub fn new(repo: Arc<dyn KeywordRepository>) -> Self {
        Self { repo }
    }

    /// Seed the store with initial lists on first start only. Once seeded,
    /// the store is authoritative even if every word is later removed.
    ///
    /// Returns how many words were written.
    pub fn seed_once(&self, include: &[String], exclude: &[String]) -> Result<usize, DomainError> {
        if self.repo.is_seeded()? {
            return Ok(0);
        }
        let mut written = 0;
        for (words, kind) in [(include, KeywordKind::Include), (exclude, KeywordKind::Exclude)] {
            for word in words {
                // Blank lines in keyword files are skipped rather than failing start-up
                let Ok(word) = normalize_keyword(word) else {
                    continue;
                };
                self.repo.upsert(&word, kind)?;
                written += 1;
            }
        }
        self.repo.mark_seeded()?;
        info!(count = written, "Seeded keyword store with initial lists");
        Ok(written)
    }

    /// Add an include keyword. Returns the normalised word.
    pub fn add_keyword(&self, word: &str) -> Result<String, DomainError> {
        self.add(word, KeywordKind::Include)
    }

    /// Add an exclude word. Returns the normalised word.
    pub fn add_exclude_word(&self, word: &str) -> Result<String, DomainError> {
        self.add(word, KeywordKind::Exclude)
    }

    pub fn add(&self, word: &str, kind: KeywordKind) -> Result<String, DomainError> {
        let word = normalize_keyword(word)?;
        self.repo.upsert(&word, kind)?;
        info!(word = %word, kind = %kind, "Keyword added");
        Ok(word)
    }

    /// Remove a word from whichever set holds it. Returns whether it was present.
    pub fn remove_keyword(&self, word: &str) -> Result<bool, DomainError> {
        let word = normalize_keyword(word)?;
        let removed = self.repo.remove(&word)?;
        if removed {
            info!(word = %word, "Keyword removed");
        }
        Ok(removed)
    }

    /// Current snapshot, read straight from the store.
    pub fn current_keywords(&self) -> Result<KeywordSet, DomainError> {
        Ok(KeywordSet::from_stored(self.repo.list()?))
    }
}
