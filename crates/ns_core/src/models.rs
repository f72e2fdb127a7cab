use std::fmt;

use async_trait::async_trait;
use crate::Result;

/// Raw output of a sentiment classifier, before any thresholding.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    /// Confidence in `[0, 1]`.
    pub score: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[async_trait]
pub trait SentimentModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Classify a piece of text
    async fn classify(&self, text: &str) -> Result<Classification>;
}

#[async_trait]
pub trait Translator: Send + Sync + fmt::Debug {
    /// Translate `text` between two language codes (e.g. `en` to `hi`)
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + fmt::Debug {
    /// Render `text` spoken in `language`, returning encoded audio bytes
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>>;

    /// File extension of the produced audio
    fn extension(&self) -> &str {
        "mp3"
    }
}
