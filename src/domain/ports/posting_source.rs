use crate::domain::entities::posting::Posting;
use async_trait::async_trait;

/// A marketplace listing that yields candidate postings once per cycle.
///
/// Implementations return an empty list when the page has no postings and
/// reserve errors for transport or parse failures.
#[async_trait]
pub trait PostingSource: Send + Sync {
    /// Human-readable name of this source, stamped onto every posting.
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<Posting>, FetchError>;
}

#[derive(Debug)]
pub enum FetchError {
    /// HTTP or network error
    Network(String),
    /// Non-success HTTP status
    Status(u16),
    /// Markup could not be parsed with the configured layout
    Parse(String),
    /// The fetch task panicked or was cancelled
    Aborted(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {msg}"),
            FetchError::Status(code) => write!(f, "Unexpected HTTP status {code}"),
            FetchError::Parse(msg) => write!(f, "Parse error: {msg}"),
            FetchError::Aborted(msg) => write!(f, "Fetch aborted: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Network(e.to_string()),
        }
    }
}
