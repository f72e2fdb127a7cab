use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

pub const DEFAULT_ARTICLE_LIMIT: usize = 10;

/// Articles collected for one company, plus how many candidates were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub articles: Vec<Article>,
    pub skipped: usize,
}

impl FetchOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Returns the name of the source
    fn name(&self) -> &str;

    /// Fetch at most `limit` unscored articles about `company`.
    ///
    /// Upstream failures are logged and reported as an empty outcome; an
    /// `Err` is reserved for problems the caller must see.
    async fn fetch(&self, company: &str, limit: usize) -> Result<FetchOutcome>;
}
