//! HTML listing-page sources.
//!
//! Each marketplace is described by a [`SiteLayout`]: the listing URL and the
//! CSS selectors for a posting card and its fields. [`HtmlSource`] fetches
//! the page and turns every card into a [`Posting`].

pub mod layouts;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::domain::entities::posting::Posting;
use crate::domain::error::DomainError;
use crate::domain::ports::posting_source::{FetchError, PostingSource};

const USER_AGENT: &str = concat!("jobwatch/", env!("CARGO_PKG_VERSION"));

/// Where a marketplace lists its jobs and how to read a posting card.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    pub name: String,
    pub listing_url: String,
    /// Selector for one posting card.
    pub item: String,
    /// Title link selectors, tried in order. The matched element's `href` is the link.
    pub title: Vec<String>,
    pub description: Option<String>,
    pub price: Option<String>,
}

struct CompiledLayout {
    item: Selector,
    title: Vec<Selector>,
    description: Option<Selector>,
    price: Option<Selector>,
}

impl CompiledLayout {
    fn compile(layout: &SiteLayout) -> Result<Self, DomainError> {
        Ok(Self {
            item: parse_selector(&layout.item)?,
            title: layout
                .title
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_, _>>()?,
            description: layout.description.as_deref().map(parse_selector).transpose()?,
            price: layout.price.as_deref().map(parse_selector).transpose()?,
        })
    }
}

fn parse_selector(s: &str) -> Result<Selector, DomainError> {
    Selector::parse(s).map_err(|e| DomainError::Config(format!("Invalid selector '{s}': {e:?}")))
}

pub struct HtmlSource {
    layout: SiteLayout,
    compiled: CompiledLayout,
    base_url: Url,
    client: reqwest::Client,
}

impl HtmlSource {
    pub fn new(layout: SiteLayout, timeout: Duration) -> Result<Self, DomainError> {
        let compiled = CompiledLayout::compile(&layout)?;
        let base_url = Url::parse(&layout.listing_url)
            .map_err(|e| DomainError::Config(format!("Invalid URL '{}': {e}", layout.listing_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3"),
        );
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client error: {e}")))?;

        Ok(Self {
            layout,
            compiled,
            base_url,
            client,
        })
    }

    /// Extract postings from a listing page. Cards without a title or link are skipped.
    pub fn parse_listing(&self, html: &str) -> Vec<Posting> {
        let document = Html::parse_document(html);
        document
            .select(&self.compiled.item)
            .filter_map(|card| self.parse_card(card))
            .collect()
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Option<Posting> {
        let title_elem = self
            .compiled
            .title
            .iter()
            .find_map(|sel| card.select(sel).next())?;
        let title = element_text(title_elem);
        let href = title_elem.value().attr("href")?;
        if title.is_empty() {
            return None;
        }
        let link = self.base_url.join(href).ok()?.to_string();

        let description = self
            .compiled
            .description
            .as_ref()
            .and_then(|sel| card.select(sel).next())
            .map(element_text)
            .unwrap_or_default();
        let price = self
            .compiled
            .price
            .as_ref()
            .and_then(|sel| card.select(sel).next())
            .map(element_text)
            .filter(|p| !p.is_empty());

        Some(Posting::new(title, description, link, price, self.layout.name.clone()))
    }
}

/// Element text with runs of whitespace collapsed to single spaces.
fn element_text(elem: ElementRef<'_>) -> String {
    elem.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl PostingSource for HtmlSource {
    fn name(&self) -> &str {
        &self.layout.name
    }

    async fn fetch(&self) -> Result<Vec<Posting>, FetchError> {
        let resp = self.client.get(self.base_url.as_str()).send().await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        let postings = self.parse_listing(&body);
        debug!(source = %self.layout.name, count = postings.len(), "Parsed listing page");
        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SiteLayout {
        SiteLayout {
            name: "Test".into(),
            listing_url: "https://jobs.example.com/projects/".into(),
            item: "div.job".into(),
            title: vec!["a.title".into(), "a".into()],
            description: Some("p.desc".into()),
            price: Some(".price".into()),
        }
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let mut bad = layout();
        bad.item = "[[invalid".into();
        let err = HtmlSource::new(bad, Duration::from_secs(5)).err().unwrap();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_parse_listing_extracts_fields() {
        let source = HtmlSource::new(layout(), Duration::from_secs(5)).unwrap();
        let html = r#"
            <div class="job">
                <a class="title" href="/projects/1">  Landing   page
                </a>
                <p class="desc">Need a <b>responsive</b> site</p>
                <span class="price">10 000 ₽</span>
            </div>
            <div class="job">
                <a href="https://other.example.com/p/2">Fallback title</a>
            </div>
            <div class="job"><span>no link here</span></div>
        "#;
        let postings = source.parse_listing(html);
        assert_eq!(postings.len(), 2);

        assert_eq!(postings[0].title, "Landing page");
        assert_eq!(postings[0].link, "https://jobs.example.com/projects/1");
        assert_eq!(postings[0].description, "Need a responsive site");
        assert_eq!(postings[0].price.as_deref(), Some("10 000 ₽"));
        assert_eq!(postings[0].source, "Test");

        assert_eq!(postings[1].title, "Fallback title");
        assert_eq!(postings[1].link, "https://other.example.com/p/2");
        assert_eq!(postings[1].description, "");
        assert_eq!(postings[1].price, None);
    }

    #[test]
    fn test_parse_listing_empty_page_is_empty() {
        let source = HtmlSource::new(layout(), Duration::from_secs(5)).unwrap();
        assert!(source.parse_listing("<html><body></body></html>").is_empty());
    }
}
