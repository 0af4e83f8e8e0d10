//! Clients for the third-party HTTP APIs the pipeline depends on.

pub mod client;
pub mod quote;
pub mod translate;

pub use client::build_http_client;
pub use quote::{QuoteSource, RAPIDAPI_KEY_ENV, RapidApiQuoteSource};
pub use translate::{GCP_API_KEY_ENV, GoogleTranslator, Translator};
