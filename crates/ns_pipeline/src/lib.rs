use std::fmt;
use std::sync::Arc;

use ns_core::{
    AnalysisReport, AnalysisResult, ArticleSource, Error, Result, DEFAULT_ARTICLE_LIMIT,
};
use ns_inference::{aggregate, SentimentScorer};
use ns_speech::Narrator;
use tracing::info;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum number of articles fetched per company.
    pub limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_ARTICLE_LIMIT,
        }
    }
}

/// Runs one company through fetch, score, aggregate and narrate.
///
/// Built once at startup from long-lived services and shared between requests.
pub struct Pipeline {
    source: Arc<dyn ArticleSource>,
    scorer: SentimentScorer,
    narrator: Narrator,
    config: PipelineConfig,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("source", &self.source.name())
            .field("scorer", &self.scorer)
            .field("narrator", &self.narrator)
            .field("config", &self.config)
            .finish()
    }
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        scorer: SentimentScorer,
        narrator: Narrator,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            scorer,
            narrator,
            config,
        }
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    pub async fn process(&self, company: &str) -> Result<AnalysisResult> {
        let company = company.trim();
        if company.is_empty() {
            return Err(Error::InvalidInput("Company name must not be empty".to_string()));
        }

        info!("🦗 Fetching articles for {} from {}", company, self.source.name());
        let outcome = self.source.fetch(company, self.config.limit).await?;
        if outcome.is_empty() {
            info!("📭 No articles found for {}", company);
            return Ok(AnalysisResult::no_articles());
        }

        let mut articles = outcome.articles;
        info!("🧠 Scoring {} articles ({} skipped)", articles.len(), outcome.skipped);
        for article in articles.iter_mut() {
            self.scorer.score_article(article).await?;
        }

        let comparative = aggregate(&articles)?;
        let narration = self
            .narrator
            .narrate(company, &comparative.sentiment_distribution)
            .await;
        info!("✅ {}", narration.verdict);

        Ok(AnalysisResult::Report(AnalysisReport {
            company: company.to_string(),
            audio_file: narration.audio_file().cloned(),
            audio_language: narration.language().map(str::to_string),
            final_analysis: narration.verdict,
            articles,
            comparative,
            skipped_articles: outcome.skipped,
        }))
    }
}
