//! Built-in marketplace layouts.
//!
//! Selectors track each site's current markup and break whenever the site
//! is redesigned; a broken layout only yields an empty source.

use super::SiteLayout;

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn fl_ru() -> SiteLayout {
    SiteLayout {
        name: "FL.ru".into(),
        listing_url: "https://www.fl.ru/projects/".into(),
        item: ".b-post".into(),
        title: strings(&[".b-post__link"]),
        description: Some(".b-post__txt".into()),
        price: Some(".b-post__price".into()),
    }
}

pub fn kwork() -> SiteLayout {
    SiteLayout {
        name: "Kwork".into(),
        listing_url: "https://kwork.ru/projects".into(),
        item: ".card".into(),
        title: strings(&[".card__title a", "a.card__title"]),
        description: Some(".card__description".into()),
        price: Some(".card__price".into()),
    }
}

pub fn freelance_ru() -> SiteLayout {
    SiteLayout {
        name: "Freelance.ru".into(),
        listing_url: "https://freelance.ru/project/search/".into(),
        item: "div.project".into(),
        title: strings(&["h2 a"]),
        description: Some(".description".into()),
        price: Some(".cost".into()),
    }
}

pub fn upwork() -> SiteLayout {
    SiteLayout {
        name: "Upwork".into(),
        listing_url: "https://www.upwork.com/ab/feed/jobs".into(),
        item: "section.up-card-section".into(),
        title: strings(&["a.job-title-link", "a"]),
        description: Some("p".into()),
        price: Some(".amount".into()),
    }
}

/// Every built-in layout, in the order sources are processed.
pub fn all() -> Vec<SiteLayout> {
    vec![freelance_ru(), fl_ru(), kwork(), upwork()]
}
