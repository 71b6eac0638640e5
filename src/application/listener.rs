use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::application::commands::CommandHandler;
use crate::application::shutdown::ShutdownSignal;
use crate::domain::ports::command_inbox::CommandInbox;

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Poll the inbox for chat commands until shutdown.
///
/// Only messages from `allowed_chat` are acted upon; everyone else is ignored.
pub async fn run_command_listener(
    inbox: Arc<dyn CommandInbox>,
    handler: Arc<CommandHandler>,
    allowed_chat: String,
    mut shutdown: ShutdownSignal,
) {
    info!("Command listener started");
    loop {
        let batch = tokio::select! {
            batch = inbox.poll() => batch,
            _ = shutdown.wait() => break,
        };

        let messages = match batch {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "Polling for commands failed");
                tokio::select! {
                    _ = tokio::time::sleep(RETRY_DELAY) => continue,
                    _ = shutdown.wait() => break,
                }
            }
        };

        for message in messages {
            if message.chat_id != allowed_chat {
                debug!(chat_id = %message.chat_id, "Ignoring message from unknown chat");
                continue;
            }
            let Some(reply) = handler.handle(&message.text) else {
                continue;
            };
            if let Err(e) = inbox.reply(&message.chat_id, &reply).await {
                warn!(error = %e, "Failed to reply to command");
            }
        }
    }
    info!("Command listener stopped");
}
