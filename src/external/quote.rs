//! Love quote provider (RapidAPI "love-quote").

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::settings::QuoteConfig;
use crate::error::PipelineError;
use crate::models::Quote;

/// Environment variable holding the RapidAPI key
pub const RAPIDAPI_KEY_ENV: &str = "X_RAPIDAPI_KEY";

const RAPIDAPI_KEY_HEADER: &str = "X-RapidAPI-Key";

/// First pipeline stage: produce one quote or a fetch error
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self) -> Result<Quote, PipelineError>;
}

#[derive(Debug, Deserialize)]
struct LoveQuoteResponse {
    #[serde(default)]
    quote: String,
    #[serde(default)]
    author: String,
}

/// Fetches quotes with a single authenticated GET
pub struct RapidApiQuoteSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RapidApiQuoteSource {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Build from settings and the `X_RAPIDAPI_KEY` environment variable.
    ///
    /// A missing key is sent as an empty header; the provider's rejection
    /// then surfaces as a fetch error.
    pub fn from_env(client: reqwest::Client, config: &QuoteConfig) -> Self {
        let api_key = std::env::var(RAPIDAPI_KEY_ENV).unwrap_or_default();
        Self::new(client, config.endpoint.clone(), api_key)
    }
}

#[async_trait]
impl QuoteSource for RapidApiQuoteSource {
    async fn fetch(&self) -> Result<Quote, PipelineError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(RAPIDAPI_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| PipelineError::fetch(format!("Quote request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| PipelineError::fetch(format!("Quote provider HTTP error: {}", e)))?;

        let body: LoveQuoteResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::fetch(format!("Quote provider invalid JSON: {}", e)))?;

        Quote::new(body.quote, body.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source_for(server: &mockito::ServerGuard) -> RapidApiQuoteSource {
        RapidApiQuoteSource::new(
            reqwest::Client::new(),
            format!("{}/lovequote", server.url()),
            "rapid-secret",
        )
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/lovequote")
            .match_header(RAPIDAPI_KEY_HEADER, "rapid-secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"quote": "Love is patient", "author": "Anon"}).to_string())
            .create_async()
            .await;

        let quote = source_for(&server).fetch().await.unwrap();

        assert_eq!(quote.text(), "Love is patient");
        assert_eq!(quote.attribution(), "Anon");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_empty_quote() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/lovequote")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"quote": "", "author": "Anon"}).to_string())
            .create_async()
            .await;

        let err = source_for(&server).fetch().await.unwrap_err();
        assert_eq!(err, PipelineError::fetch("Quote is empty"));
    }

    #[tokio::test]
    async fn test_fetch_missing_fields_is_empty_quote() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/lovequote")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let err = source_for(&server).fetch().await.unwrap_err();
        assert_eq!(err.kind(), "fetch");
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/lovequote")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let err = source_for(&server).fetch().await.unwrap_err();
        assert_eq!(err.kind(), "fetch");
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/lovequote")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = source_for(&server).fetch().await.unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }
}
