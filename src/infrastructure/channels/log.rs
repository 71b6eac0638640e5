use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::message_channel::{MessageChannel, SendError};

/// Dry-run channel: every message is written to the log and counts as delivered.
pub struct LogChannel;

#[async_trait]
impl MessageChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, html: &str) -> Result<(), SendError> {
        info!(message = %html, "[dry-run] notification");
        Ok(())
    }
}
