//! Quote records passed between pipeline stages.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A fetched quote. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    text: String,
    attribution: String,
}

impl Quote {
    /// Build a quote, rejecting an empty text as a fetch error
    pub fn new(
        text: impl Into<String>,
        attribution: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let text = text.into();
        if text.is_empty() {
            return Err(PipelineError::fetch("Quote is empty"));
        }
        Ok(Self {
            text,
            attribution: attribution.into(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }
}

/// Quote text and attribution after translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedQuote {
    pub text: String,
    pub attribution: String,
}

impl TranslatedQuote {
    /// Pair translated strings back up with the quote they came from.
    ///
    /// Element 0 is the text and element 1 the attribution. A provider that
    /// only returns the text keeps the original attribution.
    pub fn from_translations(
        quote: &Quote,
        translations: Vec<String>,
    ) -> Result<Self, PipelineError> {
        let mut translations = translations.into_iter();
        let text = translations.next().ok_or_else(|| {
            PipelineError::translation(format!("Empty translation for text: {}", quote.text))
        })?;
        let attribution = translations
            .next()
            .unwrap_or_else(|| quote.attribution.clone());

        Ok(Self { text, attribution })
    }
}

impl From<Quote> for TranslatedQuote {
    fn from(quote: Quote) -> Self {
        Self {
            text: quote.text,
            attribution: quote.attribution,
        }
    }
}
