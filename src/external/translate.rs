//! Machine translation through the Google Cloud Translation v2 REST API.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;

use crate::config::settings::TranslationConfig;
use crate::error::PipelineError;

/// Environment variable holding the Google Cloud API key
pub const GCP_API_KEY_ENV: &str = "GCP_API_KEY";

/// Second pipeline stage: translate a batch of strings.
///
/// Implementations return translations in request order. An empty result is
/// passed back as-is; the caller decides that it is an error.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, texts: &[String]) -> Result<Vec<String>, PipelineError>;

    /// BCP-47 code of the target language
    fn target_language(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    target_language: String,
}

impl GoogleTranslator {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            target_language: target_language.into(),
        }
    }

    /// Build from settings and the `GCP_API_KEY` environment variable
    pub fn from_env(client: reqwest::Client, config: &TranslationConfig) -> Self {
        let api_key = std::env::var(GCP_API_KEY_ENV).unwrap_or_default();
        Self::new(
            client,
            config.endpoint.clone(),
            api_key,
            config.target_language.clone(),
        )
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, texts: &[String]) -> Result<Vec<String>, PipelineError> {
        let url = Url::parse_with_params(&self.endpoint, &[("key", self.api_key.as_str())])
            .map_err(|e| {
                PipelineError::translation(format!(
                    "Invalid translation endpoint '{}': {}",
                    self.endpoint, e
                ))
            })?;

        let response = self
            .client
            .post(url)
            .json(&json!({
                "q": texts,
                "target": self.target_language,
                "format": "text",
            }))
            .send()
            .await
            // The URL carries the API key
            .map_err(|e| {
                PipelineError::translation(format!(
                    "Translation request failed: {}",
                    e.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            // The API explains rejections (bad key, bad language) in the body
            let reason = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(PipelineError::translation(format!(
                "Translation provider returned {}: {}",
                status.as_u16(),
                reason
            )));
        }

        let body: TranslateResponse = response.json().await.map_err(|e| {
            PipelineError::translation(format!(
                "Translation provider invalid JSON: {}",
                e.without_url()
            ))
        })?;

        Ok(body
            .data
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect())
    }

    fn target_language(&self) -> &str {
        &self.target_language
    }
}
