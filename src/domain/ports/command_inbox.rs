use crate::domain::ports::message_channel::SendError;
use async_trait::async_trait;

/// A text message addressed to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: String,
    pub text: String,
}

/// Source of chat commands and the way to answer them.
#[async_trait]
pub trait CommandInbox: Send + Sync {
    /// Wait for the next batch of messages. May return an empty batch on timeout.
    async fn poll(&self) -> Result<Vec<InboundMessage>, SendError>;

    /// Reply to a chat with plain text.
    async fn reply(&self, chat_id: &str, text: &str) -> Result<(), SendError>;
}
