use std::fmt;

use async_trait::async_trait;
use ns_core::{Error, Result, Translator};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::SpeechConfig;

/// Returns the text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Google Translate through the public `translate_a/single` endpoint.
pub struct GoogleTranslator {
    client: Client,
    endpoint: Url,
}

impl GoogleTranslator {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        let endpoint = crate::endpoint(&config.translate_url, "translate_a/single")?;

        Ok(Self { client, endpoint })
    }
}

impl fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslator")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

/// The response is a nested array; the first element lists translated
/// segments, each of which starts with the translated text.
fn parse_translation(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Speech("Unexpected translation response".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(Error::Speech("Translation came back empty".to_string()));
    }
    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let body = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        parse_translation(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn translator_for(server: &MockServer) -> GoogleTranslator {
        let config = SpeechConfig {
            translate_url: server.uri(),
            ..Default::default()
        };
        GoogleTranslator::new(&config).unwrap()
    }

    #[test]
    fn test_parse_translation_joins_segments() {
        let body = json!([[["नमस्ते। ", "Hello. ", null, null, 10], ["दुनिया", "World", null, null, 10]], null, "en"]);
        assert_eq!(parse_translation(&body).unwrap(), "नमस्ते। दुनिया");
    }

    #[test]
    fn test_parse_translation_rejects_garbage() {
        assert!(parse_translation(&json!({"error": "nope"})).is_err());
        assert!(parse_translation(&json!([[]])).is_err());
    }

    #[tokio::test]
    async fn test_identity_translator() {
        let out = IdentityTranslator.translate("same", "en", "en").await.unwrap();
        assert_eq!(out, "same");
    }

    #[tokio::test]
    async fn test_google_translate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("sl", "en"))
            .and(query_param("tl", "hi"))
            .and(query_param("q", "Good news."))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[["अच्छी खबर।", "Good news.", null, null, 1]], null, "en"])))
            .mount(&server)
            .await;

        let out = translator_for(&server).translate("Good news.", "en", "hi").await.unwrap();
        assert_eq!(out, "अच्छी खबर।");
    }

    #[tokio::test]
    async fn test_google_translate_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let result = translator_for(&server).translate("x", "en", "hi").await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
