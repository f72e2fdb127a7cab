use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use ns_core::{Article, ArticleSource, FetchOutcome, Result};
use reqwest::Client;
use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

use super::{utils, SourceConfig};

const SUMMARY_PARAGRAPHS: usize = 3;
const SUMMARY_MAX_CHARS: usize = 200;
const NO_TITLE: &str = "No Title";
const NO_SUMMARY: &str = "No summary available";

/// Finds articles through a web search restricted to .edu/.org/.gov sites,
/// then scrapes title and summary from every result page.
#[derive(Debug, Clone)]
pub struct WebSearchSource {
    client: Client,
    search_url: Url,
    excluded_hosts: Vec<String>,
    request_timeout: Duration,
}

impl WebSearchSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.page_timeout)
            .build()?;

        Ok(Self {
            client,
            search_url: utils::parse_url(&config.search_url)?,
            excluded_hosts: config.excluded_hosts.clone(),
            request_timeout: config.request_timeout,
        })
    }

    pub fn build_query(company: &str) -> String {
        format!(
            "{} news site:*.edu | site:*.org | site:*.gov -inurl:(signup | login)",
            company
        )
    }

    async fn search(&self, company: &str) -> Result<String> {
        let query = Self::build_query(company);
        debug!("🔎 Searching: {}", query);

        let html = self
            .client
            .get(self.search_url.clone())
            .query(&[("q", query.as_str())])
            .timeout(self.request_timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(html)
    }

    /// Result links worth scraping, in page order and without duplicates.
    pub fn candidate_links(&self, html: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        let selector = utils::selector("a[href^='http']")?;

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for href in document.select(&selector).filter_map(|el| el.value().attr("href")) {
            if !self.is_candidate(href) {
                debug!("Ignoring link {}", href);
                continue;
            }
            if seen.insert(href.to_string()) {
                links.push(href.to_string());
            }
        }

        Ok(links)
    }

    fn is_candidate(&self, href: &str) -> bool {
        let Ok(url) = Url::parse(href) else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        if self.excluded_hosts.iter().any(|excluded| utils::host_matches(host, excluded)) {
            return false;
        }

        href.ends_with(".html") || href.ends_with(".htm") || href.ends_with('/')
    }

    pub async fn scrape_article(&self, url: &str) -> Result<Article> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_article(&html, url)
    }
}

/// Pulls title and summary out of an article page.
///
/// The title is the first `h1`, falling back to `title`. The summary joins the
/// first three paragraphs, collapses whitespace and is cut to 200 characters
/// followed by an ellipsis.
pub fn parse_article(html: &str, url: &str) -> Result<Article> {
    let document = Html::parse_document(html);

    let title = match utils::extract_text(&document, "h1")? {
        Some(title) => Some(title),
        None => utils::extract_text(&document, "title")?,
    }
    .filter(|title| !title.is_empty())
    .unwrap_or_else(|| NO_TITLE.to_string());

    let paragraphs = utils::extract_texts(&document, "p", SUMMARY_PARAGRAPHS)?;
    let mut summary = paragraphs.join(" ");
    if summary.trim().is_empty() {
        summary = NO_SUMMARY.to_string();
    }
    let summary = utils::collapse_whitespace(&summary);
    let summary = format!("{}...", utils::truncate_chars(&summary, SUMMARY_MAX_CHARS));

    Ok(Article::new(title, summary, url))
}

#[async_trait]
impl ArticleSource for WebSearchSource {
    fn name(&self) -> &str {
        "web-search"
    }

    async fn fetch(&self, company: &str, limit: usize) -> Result<FetchOutcome> {
        if limit == 0 {
            return Ok(FetchOutcome::empty());
        }

        let html = match self.search(company).await {
            Ok(html) => html,
            Err(e) => {
                warn!("⚠️ Search for {} failed: {}", company, e);
                return Ok(FetchOutcome::empty());
            }
        };

        let links = self.candidate_links(&html)?;
        info!("🦗 Found {} candidate links for {}", links.len(), company);

        let mut outcome = FetchOutcome::empty();
        for link in links {
            if outcome.articles.len() >= limit {
                break;
            }
            match self.scrape_article(&link).await {
                Ok(article) => {
                    debug!("📰 Scraped {}", article.title);
                    outcome.articles.push(article);
                }
                Err(e) => {
                    warn!("Error scraping {}: {}", link, e);
                    outcome.skipped += 1;
                }
            }
        }

        Ok(outcome)
    }
}
