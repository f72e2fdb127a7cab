use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ns_inference::SentimentScorer;
use ns_pipeline::{Pipeline, PipelineConfig};
use ns_scrappers::{SourceConfig, SourceKind};
use ns_speech::{Narrator, SpeechConfig};
use ns_web::{AppState, WebConfig};
use tracing::{info, Level};

mod logging;

#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    /// Accepts `30`, `30s`, `2m`, `1m30s`; a bare number means seconds.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_value = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_value = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds += num;
            has_value = true;
        }

        if !has_value || total_seconds == 0 {
            return Err("Duration must be a positive number of seconds".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Company news sentiment report with a spoken summary", long_about = None)]
struct Cli {
    /// Article source: search (web search + scrape) or newsapi
    #[arg(long, global = true, default_value = "search", env = "NS_SOURCE")]
    source: String,
    #[arg(long, global = true, env = "NEWSAPI_API_KEY", hide_env_values = true)]
    newsapi_key: Option<String>,
    /// Maximum number of articles per company
    #[arg(long, global = true, default_value_t = ns_core::DEFAULT_ARTICLE_LIMIT)]
    limit: usize,
    /// Sentiment model: huggingface or dummy
    #[arg(long, global = true, default_value = ns_inference::DEFAULT_MODEL, env = "NS_MODEL")]
    model: String,
    #[arg(long, global = true, default_value = ns_inference::DEFAULT_MODEL_URL)]
    model_url: String,
    #[arg(long, global = true, env = "HF_API_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,
    /// Confidence below which articles are scored Neutral
    #[arg(long, global = true, default_value_t = 0.6)]
    threshold: f32,
    #[arg(long, global = true, default_value = "en")]
    source_lang: String,
    /// Language the summary is spoken in
    #[arg(long, global = true, default_value = "hi")]
    target_lang: String,
    #[arg(long, global = true, default_value = "audio")]
    audio_dir: PathBuf,
    /// Overwrite this single file on every run instead of writing one file per request
    #[arg(long, global = true)]
    audio_file: Option<String>,
    /// Number of per-request audio files kept before the oldest are deleted
    #[arg(long, global = true, default_value_t = ns_speech::DEFAULT_MAX_AUDIO_FILES)]
    max_audio_files: usize,
    /// Timeout for translation, TTS, API and classifier calls (e.g. 30s, 1m)
    #[arg(long, global = true, default_value = "30s")]
    timeout: HumanDuration,
    /// Timeout for each scraped page
    #[arg(long, global = true, default_value = "10s")]
    page_timeout: HumanDuration,
    #[arg(long, global = true, default_value = "info", value_parser = logging::parse_level)]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Analyze one company and print the JSON report
    Analyze {
        company: String,
    },
    /// Serve the HTTP endpoint and the form UI
    Serve {
        #[arg(long, default_value = "127.0.0.1:8000", env = "NS_ADDR")]
        addr: String,
        /// Answer 404 when no articles are found
        #[arg(long)]
        strict_status: bool,
    },
}

impl Cli {
    fn source_config(&self) -> anyhow::Result<SourceConfig> {
        Ok(SourceConfig {
            kind: self.source.parse::<SourceKind>()?,
            newsapi_key: self.newsapi_key.clone(),
            page_timeout: self.page_timeout.0,
            request_timeout: self.timeout.0,
            ..Default::default()
        })
    }

    fn inference_config(&self) -> ns_inference::Config {
        ns_inference::Config {
            model_name: self.model.clone(),
            model_url: self.model_url.clone(),
            api_token: self.hf_token.clone(),
            threshold: self.threshold,
            timeout: self.timeout.0,
        }
    }

    fn speech_config(&self) -> SpeechConfig {
        SpeechConfig {
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
            audio_dir: self.audio_dir.clone(),
            audio_file: self.audio_file.clone(),
            max_audio_files: self.max_audio_files,
            timeout: self.timeout.0,
            ..Default::default()
        }
    }
}

/// Builds every long-lived service once and wires them into the pipeline.
fn build_pipeline(cli: &Cli) -> anyhow::Result<Pipeline> {
    if !(0.0..=1.0).contains(&cli.threshold) {
        anyhow::bail!("--threshold must be between 0 and 1, got {}", cli.threshold);
    }

    let source = ns_scrappers::create_source(&cli.source_config()?)
        .context("Failed to initialize the article source")?;
    info!("🦗 Article source initialized (using {})", source.name());

    let inference = cli.inference_config();
    let model = ns_inference::create_model(&inference).context("Failed to initialize the sentiment model")?;
    let scorer = SentimentScorer::with_threshold(model, inference.threshold);

    let speech = cli.speech_config();
    let translator = ns_speech::create_translator(&speech)?;
    let synthesizer = ns_speech::create_synthesizer(&speech)?;
    info!(
        "🔊 Narrator initialized ({} -> {}, audio in {})",
        speech.source_lang,
        speech.target_lang,
        speech.audio_dir.display()
    );
    let narrator = Narrator::new(translator, synthesizer, speech);

    Ok(Pipeline::new(
        source,
        scorer,
        narrator,
        PipelineConfig { limit: cli.limit },
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level);

    let pipeline = build_pipeline(&cli)?;

    match &cli.command {
        Commands::Analyze { company } => {
            let result = pipeline.process(company).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Serve { addr, strict_status } => {
            let state = AppState {
                pipeline: Arc::new(pipeline),
                config: WebConfig {
                    strict_status: *strict_status,
                },
            };
            ns_web::serve(state, addr).await?;
        }
    }

    Ok(())
}
