use std::fmt;

use async_trait::async_trait;
use ns_core::{Error, Result, SpeechSynthesizer};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::SpeechConfig;

/// Longest piece of text the TTS endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Google Translate's text-to-speech endpoint. Long text is sent in chunks and
/// the MP3 segments are concatenated in order.
pub struct GoogleTts {
    client: Client,
    endpoint: Url,
}

impl GoogleTts {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        let endpoint = crate::endpoint(&config.tts_url, "translate_tts")?;

        Ok(Self { client, endpoint })
    }
}

impl fmt::Debug for GoogleTts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTts")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

/// Splits text on whitespace into chunks of at most `max_chars` characters.
/// A single word longer than that is cut.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let cut = word.char_indices().nth(max_chars).map(|(i, _)| i).unwrap_or(word.len());
            chunks.push(word[..cut].to_string());
            word = &word[cut..];
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(Error::Speech("Nothing to speak".to_string()));
        }

        let total = chunks.len().to_string();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            debug!("🔊 Synthesizing chunk {}/{}", idx + 1, chunks.len());
            let bytes = self
                .client
                .get(self.endpoint.clone())
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.to_string().as_str()),
                    ("textlen", chunk.chars().count().to_string().as_str()),
                ])
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }
}
