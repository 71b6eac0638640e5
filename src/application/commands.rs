//! Chat command surface over the keyword set.

use std::sync::Arc;

use tracing::warn;

use crate::application::keywords::KeywordsUseCase;
use crate::domain::values::keyword_set::KeywordSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    AddKeyword(Option<String>),
    RemoveKeyword(Option<String>),
    Exclude(Option<String>),
    List,
}

impl Command {
    /// Parse a `/command [arg]` message. Returns `None` for anything that is
    /// not a known command. A `@botname` suffix on the command is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head).to_lowercase();
        let arg = parts.next().map(str::to_string);
        match name.as_str() {
            "start" => Some(Command::Start),
            "addkeyword" => Some(Command::AddKeyword(arg)),
            "removekeyword" => Some(Command::RemoveKeyword(arg)),
            "exclude" => Some(Command::Exclude(arg)),
            "list" => Some(Command::List),
            _ => None,
        }
    }
}

pub struct CommandHandler {
    keywords: Arc<KeywordsUseCase>,
}

impl CommandHandler {
    pub fn new(keywords: Arc<KeywordsUseCase>) -> Self {
        Self { keywords }
    }

    /// Handle one chat message. Returns the reply, or `None` if the message
    /// is not a command.
    pub fn handle(&self, text: &str) -> Option<String> {
        let reply = match Command::parse(text)? {
            Command::Start => "Watching freelance boards. Commands: /addkeyword <word>, \
                               /removekeyword <word>, /exclude <word>, /list"
                .to_string(),
            Command::AddKeyword(None) => "Usage: /addkeyword <word>".to_string(),
            Command::RemoveKeyword(None) => "Usage: /removekeyword <word>".to_string(),
            Command::Exclude(None) => "Usage: /exclude <word>".to_string(),
            Command::AddKeyword(Some(word)) => match self.keywords.add_keyword(&word) {
                Ok(word) => format!("Added keyword: {word}"),
                Err(e) => self.failure(e),
            },
            Command::Exclude(Some(word)) => match self.keywords.add_exclude_word(&word) {
                Ok(word) => format!("Added exclude word: {word}"),
                Err(e) => self.failure(e),
            },
            Command::RemoveKeyword(Some(word)) => match self.keywords.remove_keyword(&word) {
                Ok(true) => format!("Removed keyword: {}", word.trim().to_lowercase()),
                Ok(false) => format!("Keyword not found: {}", word.trim().to_lowercase()),
                Err(e) => self.failure(e),
            },
            Command::List => match self.keywords.current_keywords() {
                Ok(set) => format_list(&set),
                Err(e) => self.failure(e),
            },
        };
        Some(reply)
    }

    fn failure(&self, e: crate::domain::error::DomainError) -> String {
        warn!(error = %e, "Command failed");
        format!("Error: {e}")
    }
}

pub fn format_list(set: &KeywordSet) -> String {
    let include = if set.include.is_empty() {
        "(none)".to_string()
    } else {
        set.include.join(", ")
    };
    let exclude = if set.exclude.is_empty() {
        "(none)".to_string()
    } else {
        set.exclude.join(", ")
    };
    format!("Keywords: {include}\nExcluded: {exclude}")
}
