//! Telegram Bot API adapter.
//!
//! One `TelegramBot` serves as both the outbound notification channel
//! (`sendMessage` with HTML parse mode to the configured chat) and the
//! command inbox (`getUpdates` long polling).

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::ports::command_inbox::{CommandInbox, InboundMessage};
use crate::domain::ports::message_channel::{MessageChannel, SendError};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

pub struct TelegramBot {
    token: String,
    chat_id: String,
    api_base: String,
    poll_timeout_secs: u64,
    next_update_id: AtomicI64,
    client: reqwest::Client,
}

impl TelegramBot {
    /// Returns [`DomainError::Config`] when the token or chat id is empty.
    pub fn new(token: String, chat_id: String, timeout: Duration) -> Result<Self, DomainError> {
        if token.trim().is_empty() {
            return Err(DomainError::Config("Telegram bot token must not be empty".into()));
        }
        if chat_id.trim().is_empty() {
            return Err(DomainError::Config("Telegram chat id must not be empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client error: {e}")))?;
        Ok(Self {
            token,
            chat_id,
            api_base: DEFAULT_API_BASE.into(),
            poll_timeout_secs: 25,
            next_update_id: AtomicI64::new(0),
            client,
        })
    }

    /// Point the bot at a different Bot API server (e.g. a local one).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn send_message(&self, chat_id: &str, text: &str, html: bool) -> Result<(), SendError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        if html {
            body["parse_mode"] = serde_json::Value::String("HTML".into());
        }

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let api: ApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| SendError::Rejected(format!("HTTP {status}, unreadable body: {e}")))?;
        api.into_result(status).map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, status: reqwest::StatusCode) -> Result<Option<T>, SendError> {
        if self.ok {
            return Ok(self.result);
        }
        let retry_after = self.parameters.and_then(|p| p.retry_after);
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || retry_after.is_some() {
            return Err(SendError::RateLimited {
                retry_after_secs: retry_after.unwrap_or(30),
            });
        }
        Err(SendError::Rejected(
            self.description
                .unwrap_or_else(|| format!("Telegram API returned {status}")),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[async_trait]
impl MessageChannel for TelegramBot {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, html: &str) -> Result<(), SendError> {
        debug!(chat_id = %self.chat_id, "Sending Telegram notification");
        self.send_message(&self.chat_id, html, true).await
    }
}

#[async_trait]
impl CommandInbox for TelegramBot {
    async fn poll(&self) -> Result<Vec<InboundMessage>, SendError> {
        let offset = self.next_update_id.load(Ordering::Acquire);
        let body = serde_json::json!({
            "offset": offset,
            "timeout": self.poll_timeout_secs,
            "allowed_updates": ["message"],
        });

        let response = self
            .client
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(self.poll_timeout_secs + 10))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let api: ApiResponse<Vec<Update>> = response
            .json()
            .await
            .map_err(|e| SendError::Rejected(format!("HTTP {status}, unreadable body: {e}")))?;
        let updates = api.into_result(status)?.unwrap_or_default();

        Ok(collect_messages(&self.next_update_id, updates))
    }

    async fn reply(&self, chat_id: &str, text: &str) -> Result<(), SendError> {
        self.send_message(chat_id, text, false).await
    }
}

/// Advance the offset past every update and keep the text messages.
fn collect_messages(next_update_id: &AtomicI64, updates: Vec<Update>) -> Vec<InboundMessage> {
    if let Some(max) = updates.iter().map(|u| u.update_id).max() {
        next_update_id.fetch_max(max + 1, Ordering::AcqRel);
    }
    updates
        .into_iter()
        .filter_map(|u| u.message)
        .filter_map(|m| {
            m.text.map(|text| InboundMessage {
                chat_id: m.chat.id.to_string(),
                text,
            })
        })
        .collect()
}
