use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ns_core::{Article, ArticleSource, Error, FetchOutcome, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use super::{utils, SourceConfig};

const NO_TITLE: &str = "No Title";
const NO_DESCRIPTION: &str = "No description available.";
/// Title NewsAPI substitutes for articles pulled by the publisher.
const REMOVED_TITLE: &str = "[Removed]";

#[derive(Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "publishedAt")]
    published_at: Option<String>,
}

/// Hosted news search (`/v2/everything`), newest first.
pub struct NewsApiSource {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl NewsApiSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let api_key = config
            .newsapi_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("The newsapi source requires an API key".to_string()))?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: utils::parse_base_url(&config.newsapi_url)?,
            api_key,
        })
    }

    async fn query(&self, company: &str, limit: usize) -> Result<Vec<NewsApiArticle>> {
        let url = self
            .base_url
            .join("v2/everything")
            .map_err(|e| Error::Config(format!("Invalid NewsAPI URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .query(&[
                ("q", company),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", limit.to_string().as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<NewsApiResponse>()
            .await?;

        if response.status != "ok" {
            return Err(Error::Scraping(format!(
                "NewsAPI returned status {}: {}",
                response.status,
                response.message.unwrap_or_default()
            )));
        }

        Ok(response.articles)
    }
}

impl fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn to_article(result: NewsApiArticle) -> Option<Article> {
    let url = result.url.filter(|url| !url.is_empty())?;
    let title = result
        .title
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());
    if title == REMOVED_TITLE {
        return None;
    }

    let summary = result
        .description
        .filter(|description| !description.trim().is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let mut article = Article::new(title.clone(), summary, url);
    article.topics = vec![title];
    article.published_at = result
        .published_at
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|dt| dt.with_timezone(&Utc));
    Some(article)
}

#[async_trait]
impl ArticleSource for NewsApiSource {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn fetch(&self, company: &str, limit: usize) -> Result<FetchOutcome> {
        if limit == 0 {
            return Ok(FetchOutcome::empty());
        }

        let results = match self.query(company, limit).await {
            Ok(results) => results,
            Err(e) => {
                warn!("⚠️ NewsAPI request for {} failed: {}", company, e);
                return Ok(FetchOutcome::empty());
            }
        };

        let mut outcome = FetchOutcome::empty();
        for result in results.into_iter().take(limit) {
            match to_article(result) {
                Some(article) => outcome.articles.push(article),
                None => outcome.skipped += 1,
            }
        }
        info!("📰 NewsAPI returned {} articles for {}", outcome.articles.len(), company);

        Ok(outcome)
    }
}
