//! Keyword filter applied to every source's postings.
//!
//! Matching is plain substring search over the lower-cased title and
//! description, so a short keyword like `ui` also matches inside `build`.
//! That imprecision is accepted behaviour.

use crate::domain::entities::posting::Posting;
use crate::domain::values::keyword_set::KeywordSet;

/// Whether `text` (already lower-cased) contains at least one include word and no exclude word.
pub fn matches(text: &str, include: &[String], exclude: &[String]) -> bool {
    include.iter().any(|kw| text.contains(kw.as_str()))
        && !exclude.iter().any(|kw| text.contains(kw.as_str()))
}

/// Keep the postings that pass the include/exclude rules, preserving order.
pub fn filter(postings: Vec<Posting>, include: &[String], exclude: &[String]) -> Vec<Posting> {
    postings
        .into_iter()
        .filter(|p| matches(&p.searchable_text(), include, exclude))
        .collect()
}

pub fn filter_with(postings: Vec<Posting>, keywords: &KeywordSet) -> Vec<Posting> {
    filter(postings, &keywords.include, &keywords.exclude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_substring_matches_inside_words() {
        assert!(matches("build a tool", &words(&["ui"]), &[]));
    }

    #[test]
    fn test_empty_include_rejects_everything() {
        assert!(!matches("anything at all", &[], &[]));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        assert!(!matches("website seo audit", &words(&["website"]), &words(&["seo"])));
    }
}
