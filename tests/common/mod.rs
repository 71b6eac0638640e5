//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use jobwatch::application::cycle::CycleOptions;
use jobwatch::domain::entities::posting::Posting;
use jobwatch::domain::error::DomainError;
use jobwatch::domain::ports::command_inbox::{CommandInbox, InboundMessage};
use jobwatch::domain::ports::message_channel::{MessageChannel, SendError};
use jobwatch::domain::ports::posting_source::{FetchError, PostingSource};
use jobwatch::domain::ports::sent_link_repository::SentLinkRepository;
use jobwatch::JobWatch;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Channel that keeps every delivered message and can be told to fail.
#[derive(Default)]
pub struct RecordingChannel {
    pub sent: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl RecordingChannel {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, html: &str) -> Result<(), SendError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SendError::Network("connection reset".into()));
        }
        self.sent.lock().unwrap().push(html.to_string());
        Ok(())
    }
}

/// Answers the first `limited` sends with a rate-limit error, then delivers.
pub struct RateLimitedChannel {
    pub limited: AtomicUsize,
    pub retry_after_secs: u64,
    pub sent: Mutex<Vec<String>>,
}

impl RateLimitedChannel {
    pub fn new(limited: usize, retry_after_secs: u64) -> Self {
        Self {
            limited: AtomicUsize::new(limited),
            retry_after_secs,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageChannel for RateLimitedChannel {
    fn name(&self) -> &str {
        "rate-limited"
    }

    async fn send(&self, html: &str) -> Result<(), SendError> {
        let remaining = self.limited.load(Ordering::SeqCst);
        if remaining > 0 {
            self.limited.store(remaining - 1, Ordering::SeqCst);
            return Err(SendError::RateLimited {
                retry_after_secs: self.retry_after_secs,
            });
        }
        self.sent.lock().unwrap().push(html.to_string());
        Ok(())
    }
}

/// Sent-link store whose reads work but whose writes always fail.
#[derive(Default)]
pub struct ReadOnlySentLinks;

impl SentLinkRepository for ReadOnlySentLinks {
    fn insert(&self, _link: &str) -> Result<(), DomainError> {
        Err(DomainError::Persistence("attempt to write a readonly database".into()))
    }

    fn contains(&self, _link: &str) -> Result<bool, DomainError> {
        Ok(false)
    }

    fn load_all(&self) -> Result<Vec<String>, DomainError> {
        Ok(Vec::new())
    }

    fn count(&self) -> Result<usize, DomainError> {
        Ok(0)
    }
}

/// Inbox that hands out queued batches, then waits forever.
#[derive(Default)]
pub struct ScriptedInbox {
    pub batches: Mutex<VecDeque<Vec<InboundMessage>>>,
    pub replies: Mutex<Vec<(String, String)>>,
}

impl ScriptedInbox {
    pub fn with_batch(messages: &[(&str, &str)]) -> Self {
        let inbox = Self::default();
        inbox.batches.lock().unwrap().push_back(
            messages
                .iter()
                .map(|(chat_id, text)| InboundMessage {
                    chat_id: chat_id.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        );
        inbox
    }

    pub fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandInbox for ScriptedInbox {
    async fn poll(&self) -> Result<Vec<InboundMessage>, SendError> {
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(batch) => Ok(batch),
            None => std::future::pending().await,
        }
    }

    async fn reply(&self, chat_id: &str, text: &str) -> Result<(), SendError> {
        self.replies
            .lock()
            .unwrap()
            .push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}

pub struct StaticSource {
    pub name: String,
    pub postings: Vec<Posting>,
    pub delay: Duration,
}

impl StaticSource {
    pub fn new(name: &str, postings: Vec<Posting>) -> Self {
        Self {
            name: name.into(),
            postings,
            delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl PostingSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Posting>, FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.postings.clone())
    }
}

/// Counts fetches; always returns nothing.
#[derive(Default)]
pub struct CountingSource {
    pub fetches: AtomicUsize,
}

impl CountingSource {
    pub fn count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostingSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    async fn fetch(&self) -> Result<Vec<Posting>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

pub struct FailingSource;

#[async_trait]
impl PostingSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch(&self) -> Result<Vec<Posting>, FetchError> {
        Err(FetchError::Status(503))
    }
}

pub struct PanickingSource;

#[async_trait]
impl PostingSource for PanickingSource {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn fetch(&self) -> Result<Vec<Posting>, FetchError> {
        panic!("markup changed under us");
    }
}

pub fn posting(source: &str, title: &str, link: &str) -> Posting {
    Posting::new(title, "", link, None, source)
}

pub fn fast_options() -> CycleOptions {
    CycleOptions {
        notify_delay: Duration::ZERO,
        ..CycleOptions::default()
    }
}

/// In-memory instance with the `сайт` keyword and the `seo` exclude word.
pub fn setup(
    channel: Arc<RecordingChannel>,
    sources: Vec<Arc<dyn PostingSource>>,
) -> JobWatch {
    setup_with(channel, sources, fast_options())
}

pub fn setup_with(
    channel: Arc<dyn MessageChannel>,
    sources: Vec<Arc<dyn PostingSource>>,
    options: CycleOptions,
) -> JobWatch {
    let jw = JobWatch::with_providers(":memory:", channel, sources, options).unwrap();
    jw.seed_keywords(&["сайт".to_string()], &["seo".to_string()])
        .unwrap();
    jw
}
