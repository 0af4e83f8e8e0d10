//! Core notification channel trait and payload type.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::models::TranslatedQuote;

/// Text handed to a channel, with an optional rich-text rendering.
///
/// Channels that understand HTML (the chat bot) prefer `html`; every other
/// transport sends `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPayload {
    text: String,
    html: Option<String>,
}

impl DeliveryPayload {
    /// A plain message with no markup
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: None,
        }
    }

    /// Render a quote, labelling the attribution with `attribution_label`
    pub fn from_quote(quote: &TranslatedQuote, attribution_label: &str) -> Self {
        Self {
            text: format!("{}\n— {}", quote.text, quote.attribution),
            html: Some(format!(
                "<blockquote>{}</blockquote><b>{}: </b>{}",
                escape_html(&quote.text),
                attribution_label,
                escape_html(&quote.attribution)
            )),
        }
    }

    /// The error's message, verbatim
    pub fn from_error(error: &PipelineError) -> Self {
        Self::plain(error.to_string())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// HTML rendering, falling back to the escaped plain text
    pub fn html(&self) -> String {
        match &self.html {
            Some(html) => html.clone(),
            None => escape_html(&self.text),
        }
    }
}

/// Escape the characters Telegram's HTML parse mode treats as markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Label placed before the attribution, in the quote's language
pub fn attribution_label(language: &str) -> &'static str {
    let primary = language.split(['-', '_']).next().unwrap_or_default();
    match primary.to_lowercase().as_str() {
        "pt" | "es" => "Por",
        "fr" => "Par",
        "de" => "Von",
        "it" => "Di",
        _ => "By",
    }
}

/// A delivery mechanism for text payloads (desktop, chat bot, SMS).
///
/// Uses `async_trait` so channels can be held as `Box<dyn Notifier>`.
/// A call either fully succeeds or returns a `PipelineError::Delivery`;
/// implementations never retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<(), PipelineError>;

    /// Stable identifier for logging (e.g. "telegram")
    fn name(&self) -> &'static str;

    /// Human-readable name used in confirmation messages
    fn display_name(&self) -> &'static str {
        self.name()
    }
}
