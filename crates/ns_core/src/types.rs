use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message returned in place of a report when the source found nothing.
pub const NO_ARTICLES_MESSAGE: &str = "No articles found for this company.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Labels in tie-break priority order.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Parses a classifier label case-insensitively (`"POSITIVE"`, `"positive"`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub url: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn new(title: impl Into<String>, summary: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            url: url.into(),
            topics: Vec::new(),
            sentiment: None,
            published_at: None,
        }
    }
}

/// Per-label article counts. Always carries all three labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// The label with the highest count. Ties go to the earlier label in
    /// `Sentiment::ALL` (Positive, then Negative, then Neutral).
    pub fn dominant(&self) -> Sentiment {
        let mut best = Sentiment::Positive;
        for sentiment in Sentiment::ALL {
            if self.count(sentiment) > self.count(best) {
                best = sentiment;
            }
        }
        best
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    #[serde(rename = "Comparison")]
    pub comparison: String,
    #[serde(rename = "Impact")]
    pub impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicOverlap {
    #[serde(rename = "Common Topics")]
    pub common_topics: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparativeReport {
    #[serde(rename = "Sentiment Distribution")]
    pub sentiment_distribution: SentimentDistribution,
    #[serde(rename = "Coverage Differences")]
    pub comparisons: Vec<Comparison>,
    #[serde(rename = "Topic Overlap")]
    pub topic_overlap: TopicOverlap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Articles")]
    pub articles: Vec<Article>,
    #[serde(rename = "Comparative Sentiment Score")]
    pub comparative: ComparativeReport,
    #[serde(rename = "Final Sentiment Analysis")]
    pub final_analysis: String,
    /// `None` when speech could not be rendered.
    #[serde(rename = "Audio")]
    pub audio_file: Option<PathBuf>,
    #[serde(rename = "Audio Language", default, skip_serializing_if = "Option::is_none")]
    pub audio_language: Option<String>,
    #[serde(rename = "Skipped Articles", default)]
    pub skipped_articles: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoArticles {
    pub error: String,
}

impl Default for NoArticles {
    fn default() -> Self {
        Self {
            error: NO_ARTICLES_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Report(AnalysisReport),
    NoArticles(NoArticles),
}

impl AnalysisResult {
    pub fn no_articles() -> Self {
        AnalysisResult::NoArticles(NoArticles::default())
    }

    pub fn is_no_articles(&self) -> bool {
        matches!(self, AnalysisResult::NoArticles(_))
    }

    pub fn audio_file(&self) -> Option<&PathBuf> {
        match self {
            AnalysisResult::Report(report) => report.audio_file.as_ref(),
            AnalysisResult::NoArticles(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(Sentiment::from_label("POSITIVE"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_label("negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_label(" Neutral "), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::from_label("LABEL_1"), None);
    }

    #[test]
    fn test_dominant_tie_break() {
        let mut dist = SentimentDistribution::default();
        assert_eq!(dist.dominant(), Sentiment::Positive);

        dist.record(Sentiment::Negative);
        dist.record(Sentiment::Neutral);
        assert_eq!(dist.dominant(), Sentiment::Negative);

        dist.record(Sentiment::Neutral);
        assert_eq!(dist.dominant(), Sentiment::Neutral);

        dist.record(Sentiment::Positive);
        dist.record(Sentiment::Positive);
        assert_eq!(dist.dominant(), Sentiment::Positive);
        assert_eq!(dist.total(), 5);
    }

    #[test]
    fn test_distribution_serializes_all_labels_in_order() {
        let dist = SentimentDistribution {
            positive: 2,
            negative: 1,
            neutral: 0,
        };
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"Positive":2,"Negative":1,"Neutral":0}"#);
    }

    #[test]
    fn test_no_articles_wire_format() {
        let json = serde_json::to_value(AnalysisResult::no_articles()).unwrap();
        assert_eq!(json, serde_json::json!({"error": "No articles found for this company."}));
    }

    #[test]
    fn test_report_wire_format() {
        let mut article = Article::new("Title", "Summary...", "https://example.org/a.html");
        article.topics = vec!["Company News".to_string()];
        article.sentiment = Some(Sentiment::Positive);

        let report = AnalysisResult::Report(AnalysisReport {
            company: "Acme".to_string(),
            articles: vec![article],
            comparative: ComparativeReport::default(),
            final_analysis: "Acme's latest news coverage is mostly Positive.".to_string(),
            audio_file: None,
            audio_language: None,
            skipped_articles: 1,
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["Company"], "Acme");
        assert_eq!(json["Articles"][0]["sentiment"], "Positive");
        assert!(json["Articles"][0].get("published_at").is_none());
        assert_eq!(json["Comparative Sentiment Score"]["Topic Overlap"]["Common Topics"], serde_json::json!([]));
        assert!(json["Audio"].is_null());
        assert!(json.get("Audio Language").is_none());
        assert_eq!(json["Skipped Articles"], 1);

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
