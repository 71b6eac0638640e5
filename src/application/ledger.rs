//! Dedup ledger: which posting links have already been notified.
//!
//! The durable store is authoritative. The in-process set mirrors it so that
//! lookups during a cycle do not hit SQLite for every posting. The mirror is
//! hydrated once at start-up and written through on every `record`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{error, warn};

use crate::domain::error::DomainError;
use crate::domain::ports::sent_link_repository::SentLinkRepository;

pub struct DedupLedger {
    repo: Arc<dyn SentLinkRepository>,
    mirror: Mutex<HashSet<String>>,
}

impl DedupLedger {
    /// Build the ledger, reading the full durable set once.
    pub fn hydrate(repo: Arc<dyn SentLinkRepository>) -> Result<Self, DomainError> {
        let links: HashSet<String> = repo.load_all()?.into_iter().collect();
        Ok(Self {
            repo,
            mirror: Mutex::new(links),
        })
    }

    /// Whether `link` has been notified before.
    ///
    /// A mirror miss is checked against the store (read-through). If the
    /// store cannot be read the link is treated as unseen: a possible
    /// duplicate is preferred over a missed posting.
    pub fn contains(&self, link: &str) -> bool {
        if let Ok(mirror) = self.mirror.lock() {
            if mirror.contains(link) {
                return true;
            }
        }
        match self.repo.contains(link) {
            Ok(true) => {
                if let Ok(mut mirror) = self.mirror.lock() {
                    mirror.insert(link.to_string());
                }
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(link = %link, error = %e, "Sent-link lookup failed, treating as unseen");
                false
            }
        }
    }

    /// Record `link` as notified. Idempotent.
    ///
    /// The durable write happens first. The mirror is updated even when the
    /// write fails so the running process never repeats the link; the error
    /// is still returned since the store now lags until the next restart.
    pub fn record(&self, link: &str) -> Result<(), DomainError> {
        let written = self.repo.insert(link);
        if let Ok(mut mirror) = self.mirror.lock() {
            mirror.insert(link.to_string());
        }
        if let Err(e) = &written {
            error!(link = %link, error = %e, "CRITICAL: failed to persist sent link");
        }
        written
    }
}
