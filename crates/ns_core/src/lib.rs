pub mod error;
pub mod models;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use models::{Classification, SentimentModel, SpeechSynthesizer, Translator};
pub use source::{ArticleSource, FetchOutcome, DEFAULT_ARTICLE_LIMIT};
pub use types::{
    AnalysisReport, AnalysisResult, Article, ComparativeReport, Comparison, NoArticles, Sentiment,
    SentimentDistribution, TopicOverlap, NO_ARTICLES_MESSAGE,
};
