pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::commands::CommandHandler;
use crate::application::cycle::{CycleOptions, CycleReport, CycleUseCase};
use crate::application::keywords::KeywordsUseCase;
use crate::application::ledger::DedupLedger;
use crate::application::notify::{NotifyOutcome, NotifyUseCase};
use crate::application::scheduler::{run_scheduler, Schedule};
use crate::application::shutdown::{self, ShutdownSignal};
use crate::config::AppConfig;
use crate::domain::entities::posting::Posting;
use crate::domain::error::DomainError;
use crate::domain::ports::keyword_repository::KeywordRepository;
use crate::domain::ports::message_channel::MessageChannel;
use crate::domain::ports::posting_source::PostingSource;
use crate::domain::ports::sent_link_repository::SentLinkRepository;
use crate::domain::values::keyword_set::KeywordSet;
use crate::infrastructure::channels::log::LogChannel;
use crate::infrastructure::sources::{layouts, HtmlSource};
use crate::infrastructure::sqlite::keyword_repo::SqliteKeywordRepo;
use crate::infrastructure::sqlite::sent_link_repo::SqliteSentLinkRepo;
use crate::infrastructure::telegram::TelegramBot;
use std::sync::Arc;
use tokio::sync::watch;

pub struct JobWatch {
    keywords_uc: Arc<KeywordsUseCase>,
    ledger: Arc<DedupLedger>,
    notify_uc: Arc<NotifyUseCase>,
    cycle_uc: Arc<CycleUseCase>,
    sent_links: Arc<dyn SentLinkRepository>,
    shutdown_tx: watch::Sender<bool>,
    shutdown: ShutdownSignal,
}

impl JobWatch {
    /// Wire the production stack: SQLite store, Telegram channel (or the log
    /// channel when `dry_run`), and every built-in marketplace source.
    pub fn new(config: &AppConfig, dry_run: bool) -> Result<(Self, Option<Arc<TelegramBot>>), DomainError> {
        let bot = if dry_run {
            None
        } else {
            let (token, chat_id) = config.require_telegram()?;
            Some(Arc::new(TelegramBot::new(token, chat_id, config.http_timeout)?))
        };
        let channel: Arc<dyn MessageChannel> = match &bot {
            Some(bot) => bot.clone() as Arc<dyn MessageChannel>,
            None => Arc::new(LogChannel) as Arc<dyn MessageChannel>,
        };

        let sources = layouts::all()
            .into_iter()
            .map(|layout| {
                HtmlSource::new(layout, config.http_timeout)
                    .map(|s| Arc::new(s) as Arc<dyn PostingSource>)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let options = CycleOptions {
            notify_delay: config.notify_delay,
            report_errors: config.report_cycle_errors,
            ..CycleOptions::default()
        };

        let jw = Self::with_providers(&config.db_path, channel, sources, options)?;
        jw.keywords_uc
            .seed_once(&config.keywords, &config.exclude_words)?;
        Ok((jw, bot))
    }

    pub fn with_providers(
        db_path: &str,
        channel: Arc<dyn MessageChannel>,
        sources: Vec<Arc<dyn PostingSource>>,
        options: CycleOptions,
    ) -> Result<Self, DomainError> {
        let conn = infrastructure::sqlite::open(db_path)?;
        let sent_links: Arc<dyn SentLinkRepository> = Arc::new(SqliteSentLinkRepo::new(conn.clone()));
        let keyword_repo: Arc<dyn KeywordRepository> = Arc::new(SqliteKeywordRepo::new(conn));

        let ledger = Arc::new(DedupLedger::hydrate(sent_links.clone())?);
        let keywords_uc = Arc::new(KeywordsUseCase::new(keyword_repo));
        let notify_uc = Arc::new(NotifyUseCase::new(ledger.clone(), channel));
        let (shutdown_tx, shutdown) = shutdown::channel();
        let cycle_uc = Arc::new(CycleUseCase::new(
            sources,
            keywords_uc.clone(),
            notify_uc.clone(),
            options,
            shutdown.clone(),
        ));

        Ok(Self {
            keywords_uc,
            ledger,
            notify_uc,
            cycle_uc,
            sent_links,
            shutdown_tx,
            shutdown,
        })
    }

    // Delegating methods
    pub async fn run_cycle(&self) -> Result<CycleReport, DomainError> {
        self.cycle_uc.run().await
    }

    pub async fn notify(&self, posting: &Posting) -> Result<NotifyOutcome, DomainError> {
        self.notify_uc.notify(posting).await
    }

    pub fn add_keyword(&self, word: &str) -> Result<String, DomainError> {
        self.keywords_uc.add_keyword(word)
    }

    pub fn add_exclude_word(&self, word: &str) -> Result<String, DomainError> {
        self.keywords_uc.add_exclude_word(word)
    }

    pub fn remove_keyword(&self, word: &str) -> Result<bool, DomainError> {
        self.keywords_uc.remove_keyword(word)
    }

    pub fn current_keywords(&self) -> Result<KeywordSet, DomainError> {
        self.keywords_uc.current_keywords()
    }

    pub fn seed_keywords(&self, include: &[String], exclude: &[String]) -> Result<usize, DomainError> {
        self.keywords_uc.seed_once(include, exclude)
    }

    pub fn is_sent(&self, link: &str) -> bool {
        self.ledger.contains(link)
    }

    pub fn sent_count(&self) -> Result<usize, DomainError> {
        self.sent_links.count()
    }

    pub fn source_names(&self) -> Vec<String> {
        self.cycle_uc.source_names()
    }

    pub fn command_handler(&self) -> CommandHandler {
        CommandHandler::new(self.keywords_uc.clone())
    }

    /// Run the scheduler until [`JobWatch::request_shutdown`] is called.
    pub async fn run_scheduled(&self, schedule: Schedule) {
        run_scheduler(self.cycle_uc.clone(), schedule, self.shutdown.clone()).await
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Stop accepting triggers; an in-flight cycle finishes its current send.
    pub fn request_shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}
