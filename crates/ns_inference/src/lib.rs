use std::time::Duration;

pub mod comparative;
pub mod models;
pub mod scorer;

pub use comparative::aggregate;
pub use models::create_model;
pub use scorer::SentimentScorer;

pub const DEFAULT_MODEL: &str = "huggingface";
pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english";

#[derive(Debug, Clone)]
pub struct Config {
    /// Which model implementation to build (`huggingface` or `dummy`).
    pub model_name: String,
    pub model_url: String,
    pub api_token: Option<String>,
    /// Below this confidence the scorer answers Neutral.
    pub threshold: f32,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            model_url: DEFAULT_MODEL_URL.to_string(),
            api_token: None,
            threshold: scorer::DEFAULT_THRESHOLD,
            timeout: Duration::from_secs(30),
        }
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::comparative::aggregate;
    pub use super::models::create_model;
    pub use super::scorer::SentimentScorer;
    pub use ns_core::{Article, Classification, Result, Error, Sentiment, SentimentModel};
}
