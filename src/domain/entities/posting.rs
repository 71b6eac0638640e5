use serde::{Deserialize, Serialize};

/// One job listing scraped from a marketplace during a single cycle.
///
/// The `link` is the posting's identity: two postings with the same link are
/// the same posting, whatever their other fields say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub title: String,
    pub description: String,
    pub link: String,
    pub price: Option<String>,
    /// Name of the source that produced this posting.
    pub source: String,
}

impl Posting {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        price: Option<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: link.into(),
            price,
            source: source.into(),
        }
    }

    /// Text the keyword filter matches against: title and description, lower-cased.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searchable_text_is_lowercased() {
        let p = Posting::new("Rust Developer", "Build a WEB scraper", "https://x/1", None, "test");
        assert_eq!(p.searchable_text(), "rust developer build a web scraper");
    }
}
