use crate::domain::error::DomainError;

/// Durable record of every link that was successfully notified.
pub trait SentLinkRepository: Send + Sync {
    /// Insert a link; inserting an existing link is a no-op.
    fn insert(&self, link: &str) -> Result<(), DomainError>;
    fn contains(&self, link: &str) -> Result<bool, DomainError>;
    fn load_all(&self) -> Result<Vec<String>, DomainError>;
    fn count(&self) -> Result<usize, DomainError>;
}
