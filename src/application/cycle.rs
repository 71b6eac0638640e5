//! Cycle orchestrator: one fetch → filter → notify pass across all sources.
//!
//! Sources are fetched concurrently, each in its own task so that a failing
//! or panicking source only empties its own contribution. Notifications are
//! then sent strictly one at a time in source order, then discovery order.
//! Sequential sending is what makes the ledger's check-then-record safe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::application::keywords::KeywordsUseCase;
use crate::application::notify::{NotifyOutcome, NotifyUseCase};
use crate::application::shutdown::ShutdownSignal;
use crate::domain::entities::posting::Posting;
use crate::domain::error::DomainError;
use crate::domain::ports::message_channel::SendError;
use crate::domain::ports::posting_source::{FetchError, PostingSource};
use crate::domain::services::filter;

#[derive(Debug, Clone)]
pub struct CycleOptions {
    /// Pause between two outbound sends.
    pub notify_delay: Duration,
    /// Send an alert through the channel when a cycle fails as a whole.
    pub report_errors: bool,
    /// Upper bound on how long a rate-limit response may stall the cycle.
    pub max_rate_limit_wait: Duration,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            notify_delay: Duration::from_secs(1),
            report_errors: true,
            max_rate_limit_wait: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub fetched: usize,
    pub matched: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources: Vec<SourceReport>,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Postings left unattempted because shutdown was requested.
    pub abandoned: usize,
}

impl CycleReport {
    pub fn sources_failed(&self) -> usize {
        self.sources.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Clears the running flag when the cycle ends, however it ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct CycleUseCase {
    sources: Vec<Arc<dyn PostingSource>>,
    keywords: Arc<KeywordsUseCase>,
    notifier: Arc<NotifyUseCase>,
    options: CycleOptions,
    shutdown: ShutdownSignal,
    running: AtomicBool,
}

impl CycleUseCase {
    pub fn new(
        sources: Vec<Arc<dyn PostingSource>>,
        keywords: Arc<KeywordsUseCase>,
        notifier: Arc<NotifyUseCase>,
        options: CycleOptions,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            sources,
            keywords,
            notifier,
            options,
            shutdown,
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Run one cycle. Fails with [`DomainError::CycleInProgress`] if another
    /// cycle is still running.
    ///
    /// Any error escaping the cycle is logged and, if enabled, reported to
    /// the operator through the channel before being returned.
    pub async fn run(&self) -> Result<CycleReport, DomainError> {
        let _guard = RunningGuard::acquire(&self.running).ok_or(DomainError::CycleInProgress)?;

        match self.execute().await {
            Ok(report) => Ok(report),
            Err(e) => {
                error!(error = %e, "Cycle failed");
                if self.options.report_errors {
                    if let Err(alert_err) = self.notifier.alert("Cycle error", &e.to_string()).await {
                        error!(error = %alert_err, "Could not report cycle error");
                    }
                }
                Err(e)
            }
        }
    }

    async fn execute(&self) -> Result<CycleReport, DomainError> {
        let started_at = Utc::now();
        // Snapshot once: keyword edits during the cycle apply from the next one
        let keywords = self.keywords.current_keywords()?;
        info!(
            sources = self.sources.len(),
            include = keywords.include.len(),
            exclude = keywords.exclude.len(),
            "Cycle started"
        );

        let fetched = self.fan_out().await;

        let mut reports = Vec::with_capacity(fetched.len());
        let mut queue: Vec<Posting> = Vec::new();
        for (name, result) in fetched {
            match result {
                Ok(postings) => {
                    let total = postings.len();
                    let matched = filter::filter_with(postings, &keywords);
                    info!(source = %name, fetched = total, matched = matched.len(), "Source done");
                    reports.push(SourceReport {
                        source: name,
                        fetched: total,
                        matched: matched.len(),
                        error: None,
                    });
                    queue.extend(matched);
                }
                Err(error) => {
                    let err = DomainError::Fetch {
                        source_name: name.clone(),
                        error,
                    };
                    warn!(error = %err, "Source failed, skipping for this cycle");
                    reports.push(SourceReport {
                        source: name,
                        fetched: 0,
                        matched: 0,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        let mut report = CycleReport {
            started_at,
            finished_at: started_at,
            sources: reports,
            sent: 0,
            skipped: 0,
            failed: 0,
            abandoned: 0,
        };
        self.notify_all(queue, &mut report).await;
        report.finished_at = Utc::now();

        info!(
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            abandoned = report.abandoned,
            sources_failed = report.sources_failed(),
            "Cycle finished"
        );
        Ok(report)
    }

    /// Fetch every source concurrently. Results come back in source order.
    async fn fan_out(&self) -> Vec<(String, Result<Vec<Posting>, FetchError>)> {
        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                tokio::spawn(async move { source.fetch().await })
            })
            .collect();

        let joined = futures::future::join_all(handles).await;

        self.sources
            .iter()
            .zip(joined)
            .map(|(source, joined)| {
                let result = joined.unwrap_or_else(|e| Err(FetchError::Aborted(e.to_string())));
                (source.name().to_string(), result)
            })
            .collect()
    }

    async fn notify_all(&self, queue: Vec<Posting>, report: &mut CycleReport) {
        let total = queue.len();
        for (i, posting) in queue.into_iter().enumerate() {
            if self.shutdown.is_requested() {
                report.abandoned = total - i;
                warn!(abandoned = report.abandoned, "Shutdown requested, stopping notifications");
                break;
            }

            let pause = match self.notifier.notify(&posting).await {
                Ok(NotifyOutcome::Skipped) => {
                    report.skipped += 1;
                    continue;
                }
                Ok(NotifyOutcome::Sent) => {
                    report.sent += 1;
                    self.options.notify_delay
                }
                Err(DomainError::Send(SendError::RateLimited { retry_after_secs })) => {
                    report.failed += 1;
                    Duration::from_secs(retry_after_secs)
                        .min(self.options.max_rate_limit_wait)
                        .max(self.options.notify_delay)
                }
                Err(_) => {
                    report.failed += 1;
                    self.options.notify_delay
                }
            };

            if i + 1 < total {
                self.pause(pause).await;
            }
        }
    }

    /// Sleep for `duration`, returning early if shutdown is requested.
    async fn pause(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        let mut shutdown = self.shutdown.clone();
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = shutdown.wait() => {}
        }
    }
}
