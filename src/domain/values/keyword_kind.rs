use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordKind {
    Include,
    Exclude,
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordKind::Include => write!(f, "include"),
            KeywordKind::Exclude => write!(f, "exclude"),
        }
    }
}

impl FromStr for KeywordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "include" => Ok(KeywordKind::Include),
            "exclude" => Ok(KeywordKind::Exclude),
            _ => Err(format!("Unknown keyword kind: {s}")),
        }
    }
}
