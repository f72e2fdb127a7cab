use std::fmt;

use ns_core::{Classification, Result, SentimentModel};

const POSITIVE_WORDS: &[&str] = &[
    "gain", "gains", "growth", "grow", "grows", "profit", "profits", "record", "strong", "beat",
    "beats", "surge", "surges", "rise", "rises", "success", "successful", "win", "wins", "award",
    "improve", "improved", "innovative", "launch", "launches", "expand", "expands", "partnership",
    "good", "great", "excellent", "positive", "up",
];

const NEGATIVE_WORDS: &[&str] = &[
    "loss", "losses", "decline", "declines", "drop", "drops", "fall", "falls", "weak", "miss",
    "misses", "lawsuit", "fraud", "recall", "recalls", "layoff", "layoffs", "crash", "fine",
    "fined", "probe", "investigation", "scandal", "cut", "cuts", "bad", "poor", "negative", "down",
    "fail", "fails", "failure",
];

/// Offline stand-in for a real classifier. Counts positive and negative words
/// and reports the majority label, with confidence growing with the margin.
pub struct LexiconModel;

impl fmt::Debug for LexiconModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexiconModel").finish()
    }
}

impl LexiconModel {
    pub fn new() -> Self {
        Self
    }

    fn tally(text: &str) -> (usize, usize) {
        let mut positive = 0;
        let mut negative = 0;
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
        {
            if POSITIVE_WORDS.contains(&word.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                negative += 1;
            }
        }
        (positive, negative)
    }
}

impl Default for LexiconModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SentimentModel for LexiconModel {
    fn name(&self) -> &str {
        "Lexicon"
    }

    async fn classify(&self, text: &str) -> Result<Classification> {
        let (positive, negative) = Self::tally(text);
        let total = positive + negative;
        if total == 0 {
            // No signal either way
            return Ok(Classification::new("POSITIVE", 0.5));
        }

        let label = if positive >= negative { "POSITIVE" } else { "NEGATIVE" };
        let margin = positive.abs_diff(negative) as f32 / total as f32;
        Ok(Classification::new(label, 0.5 + margin / 2.0))
    }
}
