//! Triggers cycles on an interval or cron schedule.
//!
//! Cycles never overlap: the scheduler awaits each cycle before computing
//! the next fire time, and fire times that passed while a cycle was running
//! are skipped rather than queued.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{error, info, warn};

use crate::application::cycle::CycleUseCase;
use crate::application::shutdown::ShutdownSignal;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub enum Schedule {
    Interval(Duration),
    /// Cron fields are read as wall-clock time in `tz`.
    Cron {
        expression: String,
        schedule: Box<cron::Schedule>,
        tz: Tz,
    },
}

impl Schedule {
    /// Prefer the cron expression when one is given and valid; otherwise fall
    /// back to the interval.
    pub fn from_config(cron_expression: Option<&str>, interval: Duration, tz: Tz) -> Self {
        let interval = interval.max(Duration::from_secs(1));
        match cron_expression.map(str::trim).filter(|e| !e.is_empty()) {
            Some(expr) => match parse_cron(expr) {
                Ok(schedule) => Schedule::Cron {
                    expression: expr.to_string(),
                    schedule: Box::new(schedule),
                    tz,
                },
                Err(e) => {
                    warn!(cron = %expr, error = %e, "Invalid cron expression, falling back to interval");
                    Schedule::Interval(interval)
                }
            },
            None => Schedule::Interval(interval),
        }
    }

    /// The first fire time strictly after `t`.
    pub fn next_after(&self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Schedule::Interval(every) => chrono::Duration::from_std((*every).max(Duration::from_secs(1)))
                .ok()
                .map(|d| t + d),
            Schedule::Cron { schedule, tz, .. } => schedule
                .after(&t.with_timezone(tz))
                .next()
                .map(|next| next.with_timezone(&Utc)),
        }
    }

    /// The fire time following `fire_at` that is still in the future at
    /// `now`, together with how many fire times in between were missed.
    pub fn next_fire(&self, fire_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<(DateTime<Utc>, usize)> {
        let mut next = self.next_after(fire_at)?;
        let mut skipped = 0usize;
        while next <= now {
            next = self.next_after(next)?;
            skipped += 1;
        }
        Some((next, skipped))
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Interval(every) => write!(f, "every {}s", every.as_secs()),
            Schedule::Cron { expression, tz, .. } => write!(f, "cron '{expression}' ({tz})"),
        }
    }
}

/// Parse a cron expression, prepending a seconds field to 5-field expressions.
pub fn parse_cron(expr: &str) -> Result<cron::Schedule, DomainError> {
    let fields = expr.split_whitespace().count();
    let normalized = if fields == 5 {
        format!("0 {expr}")
    } else {
        expr.to_string()
    };
    cron::Schedule::from_str(&normalized)
        .map_err(|e| DomainError::Config(format!("Invalid cron expression '{expr}': {e}")))
}

/// Run cycles until shutdown is requested. The first cycle starts immediately.
pub async fn run_scheduler(cycle: Arc<CycleUseCase>, schedule: Schedule, mut shutdown: ShutdownSignal) {
    info!(schedule = %schedule, "Scheduler started");
    let mut fire_at = Utc::now();

    loop {
        let wait = (fire_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = shutdown.wait() => break,
        }

        trigger(&cycle).await;

        if shutdown.is_requested() {
            break;
        }

        let Some((next, skipped)) = schedule.next_fire(fire_at, Utc::now()) else {
            warn!(schedule = %schedule, "Schedule has no further fire times");
            break;
        };
        if skipped > 0 {
            warn!(skipped, "Cycle overran its schedule, skipping missed triggers");
        }
        fire_at = next;
    }

    info!("Scheduler stopped");
}

/// Run one cycle in its own task so that even a panic cannot take the
/// scheduler down with it.
async fn trigger(cycle: &Arc<CycleUseCase>) {
    let cycle = Arc::clone(cycle);
    match tokio::spawn(async move { cycle.run().await }).await {
        Ok(Ok(_)) => {}
        Ok(Err(DomainError::CycleInProgress)) => {
            info!("Previous cycle still running, skipping trigger");
        }
        // Already logged and reported inside the cycle
        Ok(Err(_)) => {}
        Err(e) => error!(error = %e, "Cycle task panicked"),
    }
}
