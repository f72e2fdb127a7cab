use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use std::sync::Arc;

use ns_core::{Result, SentimentDistribution, SpeechSynthesizer, Translator};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::SpeechConfig;

/// What became of the spoken rendering of a verdict.
#[derive(Debug, Clone, PartialEq)]
pub enum Speech {
    Rendered { path: PathBuf, language: String },
    /// Synthesis failed; only the text verdict is available.
    TextOnly { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Narration {
    /// Untranslated verdict, for display.
    pub verdict: String,
    pub speech: Speech,
}

impl Narration {
    pub fn audio_file(&self) -> Option<&PathBuf> {
        match &self.speech {
            Speech::Rendered { path, .. } => Some(path),
            Speech::TextOnly { .. } => None,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match &self.speech {
            Speech::Rendered { language, .. } => Some(language),
            Speech::TextOnly { .. } => None,
        }
    }
}

/// One-sentence summary naming the dominant sentiment.
pub fn verdict(company: &str, distribution: &SentimentDistribution) -> String {
    format!(
        "{}'s latest news coverage is mostly {}.",
        company,
        distribution.dominant()
    )
}

/// Lowercase ASCII alphanumerics joined by single dashes.
fn slug(company: &str) -> String {
    let slug = company
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "company".to_string()
    } else {
        slug
    }
}

pub struct Narrator {
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    config: SpeechConfig,
}

impl fmt::Debug for Narrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Narrator")
            .field("translator", &self.translator)
            .field("synthesizer", &self.synthesizer)
            .field("source_lang", &self.config.source_lang)
            .field("target_lang", &self.config.target_lang)
            .field("audio_dir", &self.config.audio_dir)
            .field("max_audio_files", &self.config.max_audio_files)
            .finish()
    }
}

impl Narrator {
    pub fn new(
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: SpeechConfig,
    ) -> Self {
        Self {
            translator,
            synthesizer,
            config,
        }
    }

    pub fn audio_dir(&self) -> &PathBuf {
        &self.config.audio_dir
    }

    /// Builds the verdict and renders it to speech. Never fails: translation
    /// problems fall back to the source language and synthesis problems to a
    /// text-only narration, both logged.
    pub async fn narrate(&self, company: &str, distribution: &SentimentDistribution) -> Narration {
        let verdict = verdict(company, distribution);

        let speech = match self.render(company, &verdict).await {
            Ok((path, language)) => {
                info!("🔊 Audio written to {} ({})", path.display(), language);
                Speech::Rendered { path, language }
            }
            Err(e) => {
                warn!("⚠️ Speech rendering failed, returning text only: {}", e);
                Speech::TextOnly {
                    reason: e.to_string(),
                }
            }
        };

        Narration { verdict, speech }
    }

    async fn render(&self, company: &str, verdict: &str) -> Result<(PathBuf, String)> {
        let (text, language) = self.translate(verdict).await;
        let audio = self.synthesizer.synthesize(&text, &language).await?;

        let path = self.audio_path(company);
        tokio::fs::create_dir_all(&self.config.audio_dir).await?;
        tokio::fs::write(&path, audio).await?;

        if self.config.audio_file.is_none() {
            if let Err(e) = self.prune(&path).await {
                warn!("⚠️ Failed to prune {}: {}", self.config.audio_dir.display(), e);
            }
        }
        Ok((path, language))
    }

    /// Deletes the oldest audio files so at most `max_audio_files` remain,
    /// `keep` included.
    async fn prune(&self, keep: &Path) -> Result<usize> {
        let extension = self.synthesizer.extension();
        let others = self.config.max_audio_files.max(1) - 1;

        let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.config.audio_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path == keep || path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            candidates.push((metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH), path));
        }

        if candidates.len() <= others {
            return Ok(0);
        }

        // Newest first
        candidates.sort_by(|a, b| b.cmp(a));
        let mut removed = 0;
        for (_, path) in candidates.into_iter().skip(others) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                // Another request may have pruned it already
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        debug!("🧹 Pruned {} old audio files", removed);
        Ok(removed)
    }

    async fn translate(&self, verdict: &str) -> (String, String) {
        let source = &self.config.source_lang;
        let target = &self.config.target_lang;
        if source.eq_ignore_ascii_case(target) {
            return (verdict.to_string(), source.clone());
        }

        match self.translator.translate(verdict, source, target).await {
            Ok(translated) => (translated, target.clone()),
            Err(e) => {
                warn!("⚠️ Translation {}->{} failed, speaking untranslated text: {}", source, target, e);
                (verdict.to_string(), source.clone())
            }
        }
    }

    fn audio_path(&self, company: &str) -> PathBuf {
        let file_name = match &self.config.audio_file {
            Some(name) => name.clone(),
            None => format!(
                "{}-{}.{}",
                slug(company),
                Uuid::new_v4(),
                self.synthesizer.extension()
            ),
        };
        self.config.audio_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ns_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct TagTranslator;

    #[async_trait]
    impl Translator for TagTranslator {
        async fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String> {
            Ok(format!("[{}] {}", target, text))
        }
    }

    #[derive(Debug)]
    struct BrokenTranslator;

    #[async_trait]
    impl Translator for BrokenTranslator {
        async fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
            Err(Error::Speech("translation offline".to_string()))
        }
    }

    /// Deterministic synthesizer: the "audio" is the language and text.
    #[derive(Debug, Default)]
    struct StubSynthesizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpeechSynthesizer for StubSynthesizer {
        async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{}|{}", language, text).into_bytes())
        }
    }

    #[derive(Debug)]
    struct BrokenSynthesizer;

    #[async_trait]
    impl SpeechSynthesizer for BrokenSynthesizer {
        async fn synthesize(&self, _text: &str, _language: &str) -> Result<Vec<u8>> {
            Err(Error::Speech("tts offline".to_string()))
        }
    }

    fn config_in(dir: &tempfile::TempDir) -> SpeechConfig {
        SpeechConfig {
            audio_dir: dir.path().join("audio"),
            ..Default::default()
        }
    }

    fn distribution(positive: usize, negative: usize, neutral: usize) -> SentimentDistribution {
        SentimentDistribution {
            positive,
            negative,
            neutral,
        }
    }

    #[test]
    fn test_verdict() {
        assert_eq!(
            verdict("Acme", &distribution(2, 1, 0)),
            "Acme's latest news coverage is mostly Positive."
        );
        assert_eq!(
            verdict("Acme", &distribution(1, 1, 3)),
            "Acme's latest news coverage is mostly Neutral."
        );
        // Ties go to Negative over Neutral
        assert_eq!(
            verdict("Acme", &distribution(0, 2, 2)),
            "Acme's latest news coverage is mostly Negative."
        );
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Acme Corp."), "acme-corp");
        assert_eq!(slug("  Tata & Sons "), "tata-sons");
        assert_eq!(slug("संस्था"), "company");
    }

    #[tokio::test]
    async fn test_narrate_translates_and_writes_audio() {
        let dir = tempfile::tempdir().unwrap();
        let narrator = Narrator::new(
            Arc::new(TagTranslator),
            Arc::new(StubSynthesizer::default()),
            config_in(&dir),
        );

        let narration = narrator.narrate("Acme Corp", &distribution(2, 1, 0)).await;
        assert_eq!(narration.verdict, "Acme Corp's latest news coverage is mostly Positive.");
        assert_eq!(narration.language(), Some("hi"));

        let path = narration.audio_file().unwrap();
        assert!(path.starts_with(dir.path().join("audio")));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("acme-corp-"));
        assert!(name.ends_with(".mp3"));

        let bytes = std::fs::read(path).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "hi|[hi] Acme Corp's latest news coverage is mostly Positive."
        );
    }

    #[tokio::test]
    async fn test_same_verdict_gives_identical_audio() {
        let dir = tempfile::tempdir().unwrap();
        let narrator = Narrator::new(
            Arc::new(TagTranslator),
            Arc::new(StubSynthesizer::default()),
            config_in(&dir),
        );

        let first = narrator.narrate("Acme", &distribution(0, 3, 1)).await;
        let second = narrator.narrate("Acme", &distribution(0, 3, 1)).await;
        let (first, second) = (first.audio_file().unwrap(), second.audio_file().unwrap());
        assert_ne!(first, second);
        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }

    #[tokio::test]
    async fn test_fixed_audio_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let config = SpeechConfig {
            audio_file: Some("output.mp3".to_string()),
            ..config_in(&dir)
        };
        let narrator = Narrator::new(Arc::new(TagTranslator), Arc::new(StubSynthesizer::default()), config);

        let first = narrator.narrate("Acme", &distribution(1, 0, 0)).await;
        let second = narrator.narrate("Acme", &distribution(0, 1, 0)).await;
        assert_eq!(first.audio_file(), second.audio_file());

        let bytes = std::fs::read(dir.path().join("audio").join("output.mp3")).unwrap();
        assert!(String::from_utf8(bytes).unwrap().ends_with("mostly Negative."));
    }

    #[tokio::test]
    async fn test_translation_failure_speaks_source_language() {
        let dir = tempfile::tempdir().unwrap();
        let narrator = Narrator::new(
            Arc::new(BrokenTranslator),
            Arc::new(StubSynthesizer::default()),
            config_in(&dir),
        );

        let narration = narrator.narrate("Acme", &distribution(1, 0, 0)).await;
        assert_eq!(narration.language(), Some("en"));
        let bytes = std::fs::read(narration.audio_file().unwrap()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "en|Acme's latest news coverage is mostly Positive."
        );
    }

    #[tokio::test]
    async fn test_same_language_skips_translation() {
        let dir = tempfile::tempdir().unwrap();
        let config = SpeechConfig {
            target_lang: "EN".to_string(),
            ..config_in(&dir)
        };
        let synthesizer = Arc::new(StubSynthesizer::default());
        let narrator = Narrator::new(Arc::new(BrokenTranslator), synthesizer.clone(), config);

        let narration = narrator.narrate("Acme", &distribution(1, 0, 0)).await;
        assert_eq!(narration.language(), Some("en"));
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 1);
    }

    fn audio_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "mp3"))
            .collect()
    }

    #[tokio::test]
    async fn test_old_audio_files_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let config = SpeechConfig {
            max_audio_files: 2,
            ..config_in(&dir)
        };
        let audio_dir = config.audio_dir.clone();
        std::fs::create_dir_all(&audio_dir).unwrap();
        std::fs::write(audio_dir.join("notes.txt"), "keep me").unwrap();

        let synthesizer = Arc::new(StubSynthesizer::default());
        let narrator = Narrator::new(Arc::new(TagTranslator), synthesizer.clone(), config);

        let mut last = None;
        for _ in 0..5 {
            let narration = narrator.narrate("Acme", &distribution(1, 0, 0)).await;
            last = narration.audio_file().cloned();
        }

        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 5);
        let files = audio_files(&audio_dir);
        assert_eq!(files.len(), 2);
        assert!(files.contains(&last.unwrap()));
        assert!(audio_dir.join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_zero_max_audio_files_keeps_latest() {
        let dir = tempfile::tempdir().unwrap();
        let config = SpeechConfig {
            max_audio_files: 0,
            ..config_in(&dir)
        };
        let audio_dir = config.audio_dir.clone();
        let narrator = Narrator::new(Arc::new(TagTranslator), Arc::new(StubSynthesizer::default()), config);

        narrator.narrate("Acme", &distribution(1, 0, 0)).await;
        let latest = narrator.narrate("Acme", &distribution(0, 1, 0)).await;

        assert_eq!(audio_files(&audio_dir), vec![latest.audio_file().unwrap().clone()]);
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_text_only() {
        let dir = tempfile::tempdir().unwrap();
        let narrator = Narrator::new(Arc::new(TagTranslator), Arc::new(BrokenSynthesizer), config_in(&dir));

        let narration = narrator.narrate("Acme", &distribution(0, 0, 1)).await;
        assert_eq!(narration.verdict, "Acme's latest news coverage is mostly Neutral.");
        assert!(narration.audio_file().is_none());
        assert!(matches!(narration.speech, Speech::TextOnly { ref reason } if reason.contains("tts offline")));
        assert!(!dir.path().join("audio").exists());
    }
}
