use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use ns_core::{ArticleSource, Error, Result};

pub mod newsapi;
pub mod search;

use newsapi::NewsApiSource;
use search::WebSearchSource;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_NEWSAPI_URL: &str = "https://newsapi.org";

/// Which article source is active. Exactly one is used per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    #[default]
    Search,
    NewsApi,
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "search" | "scrape" => Ok(SourceKind::Search),
            "newsapi" | "api" => Ok(SourceKind::NewsApi),
            other => Err(Error::Config(format!(
                "Unknown article source: {} (expected search or newsapi)",
                other
            ))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Search => f.write_str("search"),
            SourceKind::NewsApi => f.write_str("newsapi"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub search_url: String,
    /// Result links on these hosts (or their subdomains) are never scraped.
    pub excluded_hosts: Vec<String>,
    pub newsapi_url: String,
    pub newsapi_key: Option<String>,
    /// Bound on each scraped page fetch.
    pub page_timeout: Duration,
    /// Bound on search and API requests.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            excluded_hosts: vec!["google.com".to_string()],
            newsapi_url: DEFAULT_NEWSAPI_URL.to_string(),
            newsapi_key: None,
            page_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Builds the configured article source.
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn ArticleSource>> {
    match config.kind {
        SourceKind::Search => Ok(Arc::new(WebSearchSource::new(config)?)),
        SourceKind::NewsApi => Ok(Arc::new(NewsApiSource::new(config)?)),
    }
}

/// Common utilities for sources
pub(crate) mod utils {
    use ns_core::{Error, Result};
    use scraper::{Html, Selector};
    use url::Url;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::Scraping(format!("Failed to parse URL {}: {}", url, e)))
    }

    /// Parses a base URL that relative endpoints are joined onto, keeping its
    /// last path segment by ending the path with `/`.
    pub fn parse_base_url(url: &str) -> Result<Url> {
        let mut base = parse_url(url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }

    pub fn selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector).map_err(|e| Error::Scraping(format!("Invalid selector {}: {}", selector, e)))
    }

    /// Trimmed text of the first element matching `selector`.
    pub fn extract_text(document: &Html, selector: &str) -> Result<Option<String>> {
        let selector = self::selector(selector)?;
        Ok(document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string()))
    }

    /// Trimmed texts of the first `limit` elements matching `selector`.
    pub fn extract_texts(document: &Html, selector: &str, limit: usize) -> Result<Vec<String>> {
        let selector = self::selector(selector)?;
        Ok(document
            .select(&selector)
            .take(limit)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect())
    }

    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Cuts `text` to at most `max_chars` characters.
    pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }

    /// True when `host` is `domain` or one of its subdomains.
    pub fn host_matches(host: &str, domain: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let domain = domain.to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{}", domain))
    }
}
