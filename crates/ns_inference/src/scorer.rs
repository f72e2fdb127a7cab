use std::fmt;
use std::sync::Arc;

use ns_core::{Article, Classification, Error, Result, Sentiment, SentimentModel};
use tracing::debug;

pub const DEFAULT_THRESHOLD: f32 = 0.6;

/// Topic given to articles whose source did not provide any.
pub const PLACEHOLDER_TOPIC: &str = "Company News";

/// Turns raw classifier output into one of the three sentiment labels.
pub struct SentimentScorer {
    model: Arc<dyn SentimentModel>,
    threshold: f32,
}

impl fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentScorer")
            .field("model", &self.model.name())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl SentimentScorer {
    pub fn new(model: Arc<dyn SentimentModel>) -> Self {
        Self::with_threshold(model, DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(model: Arc<dyn SentimentModel>, threshold: f32) -> Self {
        Self { model, threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub async fn score(&self, text: &str) -> Result<Sentiment> {
        let classification = self.model.classify(text).await?;
        apply_threshold(&classification, self.threshold)
    }

    /// Scores the article summary and fills the placeholder topic when the
    /// source left topics empty.
    pub async fn score_article(&self, article: &mut Article) -> Result<()> {
        let sentiment = self.score(&article.summary).await?;
        debug!("🎯 {} -> {}", article.title, sentiment);
        article.sentiment = Some(sentiment);
        if article.topics.is_empty() {
            article.topics.push(PLACEHOLDER_TOPIC.to_string());
        }
        Ok(())
    }
}

/// Low-confidence results are Neutral whatever the raw label says.
pub fn apply_threshold(classification: &Classification, threshold: f32) -> Result<Sentiment> {
    if classification.score < threshold {
        return Ok(Sentiment::Neutral);
    }
    Sentiment::from_label(&classification.label).ok_or_else(|| {
        Error::Inference(format!("Unexpected sentiment label: {}", classification.label))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedModel(Classification);

    #[async_trait]
    impl SentimentModel for FixedModel {
        fn name(&self) -> &str {
            "Fixed"
        }

        async fn classify(&self, _text: &str) -> Result<Classification> {
            Ok(self.0.clone())
        }
    }

    fn scorer(label: &str, score: f32) -> SentimentScorer {
        SentimentScorer::new(Arc::new(FixedModel(Classification::new(label, score))))
    }

    #[test]
    fn test_threshold_policy() {
        let low = Classification::new("POSITIVE", 0.59);
        assert_eq!(apply_threshold(&low, DEFAULT_THRESHOLD).unwrap(), Sentiment::Neutral);

        let low = Classification::new("NEGATIVE", 0.59);
        assert_eq!(apply_threshold(&low, DEFAULT_THRESHOLD).unwrap(), Sentiment::Neutral);

        let high = Classification::new("POSITIVE", 0.61);
        assert_eq!(apply_threshold(&high, DEFAULT_THRESHOLD).unwrap(), Sentiment::Positive);

        let high = Classification::new("negative", 0.99);
        assert_eq!(apply_threshold(&high, DEFAULT_THRESHOLD).unwrap(), Sentiment::Negative);
    }

    #[test]
    fn test_unknown_label() {
        let odd = Classification::new("LABEL_1", 0.9);
        assert!(matches!(apply_threshold(&odd, DEFAULT_THRESHOLD), Err(Error::Inference(_))));

        // Low confidence wins before the label is looked at
        let odd = Classification::new("LABEL_1", 0.1);
        assert_eq!(apply_threshold(&odd, DEFAULT_THRESHOLD).unwrap(), Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_score() {
        assert_eq!(scorer("POSITIVE", 0.61).score("x").await.unwrap(), Sentiment::Positive);
        assert_eq!(scorer("POSITIVE", 0.59).score("x").await.unwrap(), Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_score_article_fills_placeholder_topic() {
        let scorer = scorer("NEGATIVE", 0.9);

        let mut article = Article::new("Title", "Summary", "https://example.org/");
        scorer.score_article(&mut article).await.unwrap();
        assert_eq!(article.sentiment, Some(Sentiment::Negative));
        assert_eq!(article.topics, vec![PLACEHOLDER_TOPIC.to_string()]);

        let mut article = Article::new("Title", "Summary", "https://example.org/");
        article.topics = vec!["Title".to_string()];
        scorer.score_article(&mut article).await.unwrap();
        assert_eq!(article.topics, vec!["Title".to_string()]);
    }
}
