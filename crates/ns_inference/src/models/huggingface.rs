use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ns_core::{Classification, Error, Result, SentimentModel};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Config;

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
    options: ClassifyOptions,
}

#[derive(Serialize)]
struct ClassifyOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Failure { error: String },
}

/// Text classification through a hosted inference endpoint, defaulting to
/// `distilbert-base-uncased-finetuned-sst-2-english`.
pub struct HuggingFaceModel {
    client: Arc<Client>,
    api_token: Option<String>,
    model_url: Url,
}

impl HuggingFaceModel {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let model_url = Url::parse(&config.model_url)
            .map_err(|e| Error::Config(format!("Invalid model URL {}: {}", config.model_url, e)))?;

        Ok(Self {
            client: Arc::new(client),
            api_token: config.api_token.clone().filter(|token| !token.is_empty()),
            model_url,
        })
    }
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("api_token", &"<redacted>")
            .field("model_url", &self.model_url.as_str())
            .finish()
    }
}

fn best_candidate(response: ClassifyResponse) -> Result<Classification> {
    let candidates = match response {
        ClassifyResponse::Nested(nested) => nested.into_iter().next().unwrap_or_default(),
        ClassifyResponse::Flat(flat) => flat,
        ClassifyResponse::Failure { error } => return Err(Error::Inference(error)),
    };

    candidates
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|best| Classification::new(best.label, best.score))
        .ok_or_else(|| Error::Inference("Classifier returned no labels".to_string()))
}

#[async_trait]
impl SentimentModel for HuggingFaceModel {
    fn name(&self) -> &str {
        "HuggingFace"
    }

    async fn classify(&self, text: &str) -> Result<Classification> {
        let request = ClassifyRequest {
            inputs: text,
            options: ClassifyOptions { wait_for_model: true },
        };

        let mut builder = self.client.post(self.model_url.clone()).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await?
            .error_for_status()?
            .json::<ClassifyResponse>()
            .await?;

        best_candidate(response)
    }
}
