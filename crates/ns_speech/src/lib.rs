use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ns_core::{Error, Result, SpeechSynthesizer, Translator};
use url::Url;

pub mod narrator;
pub mod translate;
pub mod tts;

pub use narrator::{verdict, Narration, Narrator, Speech};
pub use translate::{GoogleTranslator, IdentityTranslator};
pub use tts::GoogleTts;

pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com";
pub const DEFAULT_TTS_URL: &str = "https://translate.google.com";
pub const DEFAULT_MAX_AUDIO_FILES: usize = 20;

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Language the verdict is written in.
    pub source_lang: String,
    /// Language the verdict is spoken in.
    pub target_lang: String,
    pub translate_url: String,
    pub tts_url: String,
    pub audio_dir: PathBuf,
    /// When set, every narration overwrites this file inside `audio_dir`
    /// instead of writing a uniquely named one.
    pub audio_file: Option<String>,
    /// Uniquely named audio files kept in `audio_dir`; older ones are pruned
    /// after each write. Never below one.
    pub max_audio_files: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            source_lang: "en".to_string(),
            target_lang: "hi".to_string(),
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            tts_url: DEFAULT_TTS_URL.to_string(),
            audio_dir: PathBuf::from("audio"),
            audio_file: None,
            max_audio_files: DEFAULT_MAX_AUDIO_FILES,
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// Joins `path` onto `base`, treating `base` as a directory even without a
/// trailing slash.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| Error::Config(format!("Invalid URL {}: {}", base, e)))?;
    if !url.path().ends_with('/') {
        let dir = format!("{}/", url.path());
        url.set_path(&dir);
    }
    url.join(path)
        .map_err(|e| Error::Config(format!("Invalid URL {}: {}", base, e)))
}

/// Identity when source and target languages match, Google Translate otherwise.
pub fn create_translator(config: &SpeechConfig) -> Result<Arc<dyn Translator>> {
    if config.source_lang.eq_ignore_ascii_case(&config.target_lang) {
        return Ok(Arc::new(IdentityTranslator));
    }
    Ok(Arc::new(GoogleTranslator::new(config)?))
}

pub fn create_synthesizer(config: &SpeechConfig) -> Result<Arc<dyn SpeechSynthesizer>> {
    Ok(Arc::new(GoogleTts::new(config)?))
}

pub mod prelude {
    pub use super::{create_synthesizer, create_translator, SpeechConfig, DEFAULT_MAX_AUDIO_FILES};
    pub use super::narrator::{Narration, Narrator, Speech};
    pub use ns_core::{Result, Error, SpeechSynthesizer, Translator};
}
