//! Telegram bot channel implementation.
//!
//! Posts messages to a group chat through the Bot API `sendMessage` method
//! using HTML parse mode.
//!
//! Bot API Reference: https://core.telegram.org/bots/api#sendmessage

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::provider::{DeliveryPayload, Notifier};
use crate::error::PipelineError;

/// Bot API response envelope
#[derive(Debug, Deserialize)]
struct TelegramReturn {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram chat channel
///
/// Holds the bot token and destination chat id. Neither is validated at
/// construction: an empty token or chat id is rejected by the Bot API and
/// surfaces as a delivery error.
///
/// # Example
/// ```ignore
/// let channel = TelegramChannel::new(client, "https://api.telegram.org", token, chat_id);
/// channel.deliver(&DeliveryPayload::plain("hello")).await?;
/// ```
#[derive(Clone)]
pub struct TelegramChannel {
    client: reqwest::Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramChannel {
    /// Creates a new Telegram channel
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `api_base` - Bot API base URL, e.g. `https://api.telegram.org`
    /// * `token` - Bot token
    /// * `chat_id` - Destination chat or group id
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Builds the `sendMessage` endpoint URL
    fn build_api_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.token
        )
    }

    /// Builds the request body for `sendMessage`
    fn build_request_body(&self, payload: &DeliveryPayload) -> serde_json::Value {
        json!({
            "chat_id": self.chat_id,
            "text": payload.html(),
            "parse_mode": "HTML",
        })
    }
}

#[async_trait]
impl Notifier for TelegramChannel {
    /// Sends the payload to the configured chat
    ///
    /// The Bot API answers with `{"ok": bool, "description": ...}` for both
    /// accepted and rejected requests, so the envelope is decoded regardless
    /// of the HTTP status.
    ///
    /// # Returns
    /// Ok(()) when the API reports `ok: true`, a delivery error otherwise
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<(), PipelineError> {
        let response = self
            .client
            .post(self.build_api_url())
            .json(&self.build_request_body(payload))
            .send()
            .await
            // The URL embeds the bot token
            .map_err(|e| {
                PipelineError::delivery(format!(
                    "Failed to send message to Telegram, {}",
                    e.without_url()
                ))
            })?;

        let status = response.status();
        let body: TelegramReturn = response.json().await.map_err(|e| {
            PipelineError::delivery(format!(
                "Failed to send message to Telegram, unexpected response ({}): {}",
                status.as_u16(),
                e.without_url()
            ))
        })?;

        if !body.ok {
            let description = body
                .description
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(PipelineError::delivery(format!(
                "Failed to send message to Telegram, {}",
                description
            )));
        }

        tracing::debug!(chat_id = %self.chat_id, "Telegram message accepted");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }

    fn display_name(&self) -> &'static str {
        "Telegram"
    }
}
