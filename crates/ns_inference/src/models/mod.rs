use std::sync::Arc;

use ns_core::{Error, Result, SentimentModel};
use tracing::info;

use crate::Config;

pub mod dummy;
pub mod huggingface;

pub use dummy::LexiconModel;
pub use huggingface::HuggingFaceModel;

/// Builds the sentiment model named in the configuration. Called once at startup;
/// the returned model is shared read-only between requests.
pub fn create_model(config: &Config) -> Result<Arc<dyn SentimentModel>> {
    let model: Arc<dyn SentimentModel> = match config.model_name.to_lowercase().as_str() {
        "huggingface" | "hf" => Arc::new(HuggingFaceModel::new(config)?),
        "dummy" | "lexicon" => Arc::new(LexiconModel::new()),
        other => {
            return Err(Error::Config(format!(
                "Unknown sentiment model: {} (expected huggingface or dummy)",
                other
            )))
        }
    };
    info!("🧠 Sentiment model initialized (using {})", model.name());
    Ok(model)
}
