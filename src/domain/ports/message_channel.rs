use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rejected by channel: {0}")]
    Rejected(String),

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl From<reqwest::Error> for SendError {
    fn from(e: reqwest::Error) -> Self {
        SendError::Network(e.to_string())
    }
}

/// The single outbound destination notifications are delivered to.
///
/// `send` returns `Ok` only once the channel has confirmed delivery.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver an HTML-formatted message.
    async fn send(&self, html: &str) -> Result<(), SendError>;
}
