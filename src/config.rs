//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally pre-loaded from a
//! `.env` file. Missing optional values fall back to defaults; the Telegram
//! credentials are checked by [`AppConfig::require_telegram`].

use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;
use tracing::warn;

use crate::domain::error::DomainError;

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "сайт", "лендинг", "веб", "html", "css", "верстка", "фриланс", "web", "website",
    "одностраничник", "портфолио", "визитка", "каталог", "корпоративный",
    "bootstrap", "wordpress", "joomla", "tilda", "wix",
    "адаптивный", "мобильная", "ui", "ux", "интерфейс",
];

pub const DEFAULT_EXCLUDE_WORDS: &[&str] = &[
    "сопровождение", "исправление", "доработка", "тестирование", "seo", "smm",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub cron_expression: Option<String>,
    /// Time zone cron expressions are evaluated in.
    pub timezone: Tz,
    pub interval: Duration,
    pub db_path: String,
    pub keywords: Vec<String>,
    pub exclude_words: Vec<String>,
    pub notify_delay: Duration,
    pub shutdown_grace: Duration,
    pub report_cycle_errors: bool,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            telegram_chat_id: None,
            cron_expression: None,
            timezone: Tz::UTC,
            interval: Duration::from_secs(30 * 60),
            db_path: "./jobwatch.db".into(),
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            exclude_words: DEFAULT_EXCLUDE_WORDS.iter().map(|s| s.to_string()).collect(),
            notify_delay: Duration::from_millis(1000),
            shutdown_grace: Duration::from_secs(30),
            report_cycle_errors: true,
            http_timeout: Duration::from_secs(20),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let number = |key: &str| -> Option<u64> {
            let raw = get(key)?;
            match raw.parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!(key, value = %raw, "Ignoring non-numeric setting");
                    None
                }
            }
        };

        let keywords = get("KEYWORDS_FILE")
            .and_then(|p| load_list_from_file(Path::new(&p)))
            .or_else(|| get("KEYWORDS").map(|v| split_list(&v)))
            .unwrap_or(defaults.keywords);
        let exclude_words = get("EXCLUDE_WORDS_FILE")
            .and_then(|p| load_list_from_file(Path::new(&p)))
            .or_else(|| get("EXCLUDE_WORDS").map(|v| split_list(&v)))
            .unwrap_or(defaults.exclude_words);

        Self {
            telegram_token: get("TELEGRAM_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            cron_expression: get("CRON_EXPRESSION"),
            timezone: get("TIMEZONE")
                .and_then(|name| match name.parse::<Tz>() {
                    Ok(tz) => Some(tz),
                    Err(e) => {
                        warn!(timezone = %name, error = %e, "Unknown time zone, using UTC");
                        None
                    }
                })
                .unwrap_or(defaults.timezone),
            interval: number("PARSING_INTERVAL")
                .filter(|m| *m > 0)
                .map(|m| Duration::from_secs(m * 60))
                .unwrap_or(defaults.interval),
            db_path: get("JOBWATCH_DB").unwrap_or(defaults.db_path),
            keywords,
            exclude_words,
            notify_delay: number("NOTIFY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.notify_delay),
            shutdown_grace: number("SHUTDOWN_GRACE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_grace),
            report_cycle_errors: get("REPORT_CYCLE_ERRORS")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(defaults.report_cycle_errors),
            http_timeout: number("HTTP_TIMEOUT_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }

    /// The Telegram token and chat id, or a fatal config error.
    pub fn require_telegram(&self) -> Result<(String, String), DomainError> {
        let token = self
            .telegram_token
            .clone()
            .ok_or_else(|| DomainError::Config("TELEGRAM_TOKEN is not set".into()))?;
        let chat_id = self
            .telegram_chat_id
            .clone()
            .ok_or_else(|| DomainError::Config("TELEGRAM_CHAT_ID is not set".into()))?;
        Ok((token, chat_id))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// One word per line. Returns `None` if the file cannot be read.
fn load_list_from_file(path: &Path) -> Option<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
        ),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read keyword file");
            None
        }
    }
}
