//! Notify use case: deliver one posting through the outbound channel, at most once.
//!
//! The ledger is consulted before rendering and updated only after the
//! channel confirms delivery. A crash between the two can produce one
//! duplicate on the next run; a failed send is never recorded and so is
//! retried on the next cycle.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::application::ledger::DedupLedger;
use crate::domain::entities::posting::Posting;
use crate::domain::error::DomainError;
use crate::domain::ports::message_channel::MessageChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyOutcome {
    /// The message was delivered and the link recorded.
    Sent,
    /// The link was already in the ledger; nothing was sent.
    Skipped,
}

pub struct NotifyUseCase {
    ledger: Arc<DedupLedger>,
    channel: Arc<dyn MessageChannel>,
}

impl NotifyUseCase {
    pub fn new(ledger: Arc<DedupLedger>, channel: Arc<dyn MessageChannel>) -> Self {
        Self { ledger, channel }
    }

    pub async fn notify(&self, posting: &Posting) -> Result<NotifyOutcome, DomainError> {
        if self.ledger.contains(&posting.link) {
            debug!(link = %posting.link, "Already notified, skipping");
            return Ok(NotifyOutcome::Skipped);
        }

        let message = render_message(posting);
        if let Err(e) = self.channel.send(&message).await {
            warn!(
                link = %posting.link,
                channel = self.channel.name(),
                error = %e,
                "Failed to send notification"
            );
            return Err(e.into());
        }
        info!(source = %posting.source, title = %posting.title, "Notification sent");

        // The send is confirmed; a failed write only widens the crash window.
        if let Err(e) = self.ledger.record(&posting.link) {
            error!(link = %posting.link, error = %e, "Sent posting not persisted to ledger");
        }
        Ok(NotifyOutcome::Sent)
    }

    /// Send an operator alert. Alerts bypass the ledger entirely.
    pub async fn alert(&self, title: &str, description: &str) -> Result<(), DomainError> {
        let message = format!(
            "<b>⚠️ {}</b>\n{}",
            escape_html(title),
            escape_html(description)
        );
        self.channel.send(&message).await?;
        Ok(())
    }
}

/// Escape `&`, `<` and `>` so arbitrary text cannot break the HTML message.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Like [`escape_html`] but also escapes double quotes, for attribute values.
fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

/// Render the fixed notification template for a posting.
pub fn render_message(posting: &Posting) -> String {
    let mut message = format!(
        "<b>🔹 New job:</b> {}\n🔗 <a href=\"{}\">{}</a>\n<b>📝 Description:</b> {}",
        escape_html(&posting.title),
        escape_attr(&posting.link),
        escape_html(&posting.link),
        escape_html(&posting.description),
    );
    if let Some(price) = posting.price.as_deref().filter(|p| !p.trim().is_empty()) {
        message.push_str(&format!("\n<b>💰 Budget:</b> {}", escape_html(price)));
    }
    message
}
