//! Escalation controller.
//!
//! Drives one run of the pipeline: fetch a quote, translate it, deliver it
//! through the selected channel and confirm through the fallback channel.
//! Any stage error is reported once through the fallback channel; there is
//! no second level of escalation.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::{PipelineError, RunError};
use crate::external::{QuoteSource, Translator};
use crate::models::{Quote, TranslatedQuote};
use crate::services::notifications::{DeliveryPayload, Notifier, attribution_label};

/// Language assumed for quotes that are not translated
const SOURCE_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationState {
    Idle,
    Fetching,
    Translating,
    Delivering,
    ReportingSuccess,
    Escalating,
    Done,
}

impl EscalationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Translating => "translating",
            Self::Delivering => "delivering",
            Self::ReportingSuccess => "reporting_success",
            Self::Escalating => "escalating",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for EscalationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs the pipeline once and routes failures to the fallback channel.
///
/// The primary channel is passed as a `Result` so a bad channel name is
/// escalated at `Delivering`, after the quote has been fetched, like any
/// other stage error.
pub struct EscalationController {
    quotes: Box<dyn QuoteSource>,
    translator: Option<Box<dyn Translator>>,
    primary: Result<Box<dyn Notifier>, PipelineError>,
    fallback: Box<dyn Notifier>,
    timings: bool,
    stage_timings: Vec<(&'static str, Duration)>,
    state: EscalationState,
    history: Vec<EscalationState>,
    failed_stage: Option<EscalationState>,
}

impl EscalationController {
    pub fn new(
        quotes: Box<dyn QuoteSource>,
        primary: Result<Box<dyn Notifier>, PipelineError>,
        fallback: Box<dyn Notifier>,
    ) -> Self {
        Self {
            quotes,
            translator: None,
            primary,
            fallback,
            timings: false,
            stage_timings: Vec::new(),
            state: EscalationState::Idle,
            history: vec![EscalationState::Idle],
            failed_stage: None,
        }
    }

    /// Translate quotes before delivery. Without a translator the quote is
    /// delivered as fetched.
    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Print the elapsed time of every collaborator call
    pub fn with_timings(mut self, timings: bool) -> Self {
        self.timings = timings;
        self
    }

    pub fn state(&self) -> EscalationState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`
    pub fn history(&self) -> &[EscalationState] {
        &self.history
    }

    /// Elapsed time of every collaborator call, in call order
    pub fn stage_timings(&self) -> &[(&'static str, Duration)] {
        &self.stage_timings
    }

    /// The state that was active when the pipeline failed
    pub fn failed_stage(&self) -> Option<EscalationState> {
        self.failed_stage
    }

    /// Execute the run. Any `Err` means the process should exit non-zero.
    pub async fn run(&mut self) -> Result<(), RunError> {
        match self.run_pipeline().await {
            Ok(channel) => self.report_success(channel).await,
            Err(error) => self.escalate(error).await,
        }
    }

    async fn run_pipeline(&mut self) -> Result<&'static str, PipelineError> {
        self.transition(EscalationState::Fetching);
        let started = Instant::now();
        let quote = self.quotes.fetch().await;
        self.record_timing("fetch", started.elapsed());
        let quote = quote?;

        let (translated, language) = self.translate(quote).await?;

        self.transition(EscalationState::Delivering);
        let primary = self.primary.as_ref().map_err(Clone::clone)?;
        let channel = primary.display_name();
        let payload = DeliveryPayload::from_quote(&translated, attribution_label(&language));

        let started = Instant::now();
        let delivered = primary.deliver(&payload).await;
        self.record_timing("deliver", started.elapsed());
        delivered?;

        Ok(channel)
    }

    async fn translate(
        &mut self,
        quote: Quote,
    ) -> Result<(TranslatedQuote, String), PipelineError> {
        if self.translator.is_some() {
            self.transition(EscalationState::Translating);
        }
        let Some(translator) = self.translator.as_ref() else {
            return Ok((TranslatedQuote::from(quote), SOURCE_LANGUAGE.to_string()));
        };

        let texts = vec![quote.text().to_string(), quote.attribution().to_string()];
        let language = translator.target_language().to_string();

        let started = Instant::now();
        let translations = translator.translate(&texts).await;
        self.record_timing("translate", started.elapsed());

        let translated = TranslatedQuote::from_translations(&quote, translations?)?;
        Ok((translated, language))
    }

    async fn report_success(&mut self, channel: &'static str) -> Result<(), RunError> {
        self.transition(EscalationState::ReportingSuccess);
        let confirmation = DeliveryPayload::plain(format!("{} message delivered", channel));

        let result = self.fallback.deliver(&confirmation).await;
        self.transition(EscalationState::Done);

        match result {
            Ok(()) => {
                tracing::info!(channel = %channel, "Quote delivered");
                Ok(())
            }
            Err(error) => {
                tracing::error!(
                    channel = %channel,
                    error = %error,
                    "Quote delivered but confirmation failed"
                );
                Err(RunError::ConfirmationFailed(error))
            }
        }
    }

    async fn escalate(&mut self, error: PipelineError) -> Result<(), RunError> {
        self.failed_stage = Some(self.state);
        tracing::warn!(
            stage = %self.state,
            kind = error.kind(),
            error = %error,
            "Pipeline failed, escalating to fallback channel"
        );
        self.transition(EscalationState::Escalating);

        let result = self
            .fallback
            .deliver(&DeliveryPayload::from_error(&error))
            .await;
        self.transition(EscalationState::Done);

        match result {
            Ok(()) => Err(RunError::Escalated(error)),
            Err(fallback) => {
                tracing::error!(
                    original = %error,
                    fallback = %fallback,
                    "Fallback channel failed"
                );
                Err(RunError::EscalationFailed {
                    original: error,
                    fallback,
                })
            }
        }
    }

    fn transition(&mut self, next: EscalationState) {
        tracing::debug!(from = %self.state, to = %next, "State transition");
        self.state = next;
        self.history.push(next);
    }

    fn record_timing(&mut self, stage: &'static str, elapsed: Duration) {
        self.stage_timings.push((stage, elapsed));
        if self.timings {
            println!("{}", timing_line(stage, elapsed));
            tracing::debug!(stage, elapsed_ms = elapsed.as_millis() as u64, "Stage timing");
        }
    }
}

/// `<stage>: <duration>`, as printed in debug mode
pub fn timing_line(stage: &str, elapsed: Duration) -> String {
    format!("{}: {:?}", stage, elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    use EscalationState::*;

    struct FakeQuotes {
        result: Result<(&'static str, &'static str), PipelineError>,
    }

    #[async_trait]
    impl QuoteSource for FakeQuotes {
        async fn fetch(&self) -> Result<Quote, PipelineError> {
            let (text, author) = self.result.clone()?;
            Quote::new(text, author)
        }
    }

    #[derive(Clone, Default)]
    struct Calls(Arc<Mutex<Vec<String>>>);

    impl Calls {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }

        fn all(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FakeTranslator {
        result: Result<Vec<String>, PipelineError>,
        calls: Calls,
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(&self, texts: &[String]) -> Result<Vec<String>, PipelineError> {
            self.calls.push(texts.join("|"));
            self.result.clone()
        }

        fn target_language(&self) -> &str {
            "pt-BR"
        }
    }

    struct FakeChannel {
        name: &'static str,
        failure: Option<PipelineError>,
        received: Calls,
    }

    #[async_trait]
    impl Notifier for FakeChannel {
        async fn deliver(&self, payload: &DeliveryPayload) -> Result<(), PipelineError> {
            self.received.push(payload.html());
            match &self.failure {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }

        fn name(&self) -> &'static str {
            self.name
        }

        fn display_name(&self) -> &'static str {
            "Telegram"
        }
    }

    fn quotes(text: &'static str) -> Box<dyn QuoteSource> {
        Box::new(FakeQuotes {
            result: Ok((text, "Anon")),
        })
    }

    fn translator(result: Result<Vec<String>, PipelineError>, calls: &Calls) -> Box<dyn Translator> {
        Box::new(FakeTranslator {
            result,
            calls: calls.clone(),
        })
    }

    fn channel(failure: Option<PipelineError>, received: &Calls) -> Box<dyn Notifier> {
        Box::new(FakeChannel {
            name: "fake",
            failure,
            received: received.clone(),
        })
    }

    fn translated() -> Result<Vec<String>, PipelineError> {
        Ok(vec!["O amor é paciente".to_string(), "Anônimo".to_string()])
    }

    #[tokio::test]
    async fn test_success_path() {
        let (translations, primary, fallback) = (Calls::default(), Calls::default(), Calls::default());
        let mut controller = EscalationController::new(
            quotes("Love is patient"),
            Ok(channel(None, &primary)),
            channel(None, &fallback),
        )
        .with_translator(translator(translated(), &translations));

        assert!(controller.run().await.is_ok());

        assert_eq!(
            controller.history(),
            &[Idle, Fetching, Translating, Delivering, ReportingSuccess, Done]
        );
        assert_eq!(translations.all(), vec!["Love is patient|Anon"]);
        assert_eq!(
            primary.all(),
            vec!["<blockquote>O amor é paciente</blockquote><b>Por: </b>Anônimo"]
        );
        assert_eq!(fallback.all(), vec!["Telegram message delivered"]);
        assert_eq!(controller.failed_stage(), None);
    }

    #[tokio::test]
    async fn test_fetch_error_escalates() {
        let (translations, primary, fallback) = (Calls::default(), Calls::default(), Calls::default());
        let mut controller = EscalationController::new(
            Box::new(FakeQuotes {
                result: Err(PipelineError::fetch("Quote request failed: timeout")),
            }),
            Ok(channel(None, &primary)),
            channel(None, &fallback),
        )
        .with_translator(translator(translated(), &translations));

        let err = controller.run().await.unwrap_err();

        assert_eq!(
            err,
            RunError::Escalated(PipelineError::fetch("Quote request failed: timeout"))
        );
        assert_eq!(controller.history(), &[Idle, Fetching, Escalating, Done]);
        assert_eq!(controller.failed_stage(), Some(Fetching));
        assert_eq!(fallback.all(), vec!["Quote request failed: timeout"]);
        assert!(primary.all().is_empty());
    }

    #[tokio::test]
    async fn test_empty_quote_never_reaches_translation() {
        let (translations, primary, fallback) = (Calls::default(), Calls::default(), Calls::default());
        let mut controller = EscalationController::new(
            quotes(""),
            Ok(channel(None, &primary)),
            channel(None, &fallback),
        )
        .with_translator(translator(translated(), &translations));

        let err = controller.run().await.unwrap_err();

        assert_eq!(err.original(), Some(&PipelineError::fetch("Quote is empty")));
        assert!(translations.all().is_empty());
        assert_eq!(fallback.all(), vec!["Quote is empty"]);
    }

    #[tokio::test]
    async fn test_empty_translation_escalates_with_quote_text() {
        let (translations, primary, fallback) = (Calls::default(), Calls::default(), Calls::default());
        let mut controller = EscalationController::new(
            quotes("Love is patient"),
            Ok(channel(None, &primary)),
            channel(None, &fallback),
        )
        .with_translator(translator(Ok(vec![]), &translations));

        let err = controller.run().await.unwrap_err();

        assert_eq!(
            err,
            RunError::Escalated(PipelineError::translation(
                "Empty translation for text: Love is patient"
            ))
        );
        assert_eq!(controller.failed_stage(), Some(Translating));
        assert!(primary.all().is_empty());
        assert_eq!(fallback.all(), vec!["Empty translation for text: Love is patient"]);
    }

    #[tokio::test]
    async fn test_primary_failure_sends_one_fallback_message() {
        let (primary, fallback) = (Calls::default(), Calls::default());
        let failure = PipelineError::delivery("Failed to send message to Telegram, Unauthorized");
        let mut controller = EscalationController::new(
            quotes("Love is patient"),
            Ok(channel(Some(failure.clone()), &primary)),
            channel(None, &fallback),
        );

        let err = controller.run().await.unwrap_err();

        assert_eq!(err, RunError::Escalated(failure));
        assert_eq!(primary.all().len(), 1);
        assert_eq!(
            fallback.all(),
            vec!["Failed to send message to Telegram, Unauthorized"]
        );
        assert!(!controller.history().contains(&ReportingSuccess));
        assert_eq!(controller.state(), Done);
    }

    #[tokio::test]
    async fn test_fallback_failure_is_fatal_and_keeps_original() {
        let fallback = Calls::default();
        let original = PipelineError::fetch("Quote is empty");
        let fallback_error = PipelineError::delivery("no display");
        let mut controller = EscalationController::new(
            quotes(""),
            Ok(channel(None, &Calls::default())),
            channel(Some(fallback_error.clone()), &fallback),
        );

        let err = controller.run().await.unwrap_err();

        assert_eq!(
            err,
            RunError::EscalationFailed {
                original: original.clone(),
                fallback: fallback_error,
            }
        );
        assert_eq!(err.original(), Some(&original));
        // Single-level escalation: exactly one fallback attempt
        assert_eq!(fallback.all().len(), 1);
        assert_eq!(controller.history().last(), Some(&Done));
    }

    #[tokio::test]
    async fn test_invalid_channel_escalates_at_delivering() {
        let fallback = Calls::default();
        let mut controller = EscalationController::new(
            quotes("Love is patient"),
            Err(PipelineError::config("Service pigeon isn't valid")),
            channel(None, &fallback),
        );

        let err = controller.run().await.unwrap_err();

        assert_eq!(
            err,
            RunError::Escalated(PipelineError::config("Service pigeon isn't valid"))
        );
        assert_eq!(controller.failed_stage(), Some(Delivering));
        assert_eq!(
            controller.history(),
            &[Idle, Fetching, Delivering, Escalating, Done]
        );
        assert_eq!(fallback.all(), vec!["Service pigeon isn't valid"]);
    }

    #[tokio::test]
    async fn test_confirmation_failure_is_fatal_without_escalation() {
        let (primary, fallback) = (Calls::default(), Calls::default());
        let mut controller = EscalationController::new(
            quotes("Love is patient"),
            Ok(channel(None, &primary)),
            channel(Some(PipelineError::delivery("no display")), &fallback),
        );

        let err = controller.run().await.unwrap_err();

        assert_eq!(
            err,
            RunError::ConfirmationFailed(PipelineError::delivery("no display"))
        );
        assert_eq!(err.original(), None);
        assert_eq!(fallback.all().len(), 1);
        assert!(!controller.history().contains(&Escalating));
    }

    #[tokio::test]
    async fn test_without_translator_delivers_original_quote() {
        let (primary, fallback) = (Calls::default(), Calls::default());
        let mut controller = EscalationController::new(
            quotes("Love is patient"),
            Ok(channel(None, &primary)),
            channel(None, &fallback),
        )
        .with_timings(true);

        assert!(controller.run().await.is_ok());
        assert!(!controller.history().contains(&Translating));
        assert_eq!(
            primary.all(),
            vec!["<blockquote>Love is patient</blockquote><b>By: </b>Anon"]
        );
    }

    #[tokio::test]
    async fn test_stage_timings_follow_call_order() {
        let (translations, primary, fallback) = (Calls::default(), Calls::default(), Calls::default());
        let mut controller = EscalationController::new(
            quotes("Love is patient"),
            Ok(channel(None, &primary)),
            channel(None, &fallback),
        )
        .with_translator(translator(translated(), &translations))
        .with_timings(true);

        assert!(controller.run().await.is_ok());

        let stages: Vec<_> = controller.stage_timings().iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, vec!["fetch", "translate", "deliver"]);
    }

    #[tokio::test]
    async fn test_stage_timings_stop_at_failed_stage() {
        let fallback = Calls::default();
        let mut controller = EscalationController::new(
            quotes(""),
            Ok(channel(None, &Calls::default())),
            channel(None, &fallback),
        )
        .with_timings(true);

        assert!(controller.run().await.is_err());

        let stages: Vec<_> = controller.stage_timings().iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, vec!["fetch"]);
    }

    #[test]
    fn test_timing_line_format() {
        assert_eq!(timing_line("fetch", Duration::from_millis(250)), "fetch: 250ms");
        assert_eq!(timing_line("deliver", Duration::from_secs(1)), "deliver: 1s");
    }

    #[tokio::test]
    async fn test_primary_rejection_from_telegram_api() {
        use crate::services::notifications::TelegramChannel;
        use serde_json::json;

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/botbad-token/sendMessage")
            .with_status(401)
            .with_body(json!({"ok": false, "description": "Unauthorized"}).to_string())
            .create_async()
            .await;

        let fallback = Calls::default();
        let telegram = TelegramChannel::new(reqwest::Client::new(), server.url(), "bad-token", "1");
        let mut controller = EscalationController::new(
            quotes("Love is patient"),
            Ok(Box::new(telegram)),
            channel(None, &fallback),
        );

        let err = controller.run().await.unwrap_err();

        assert_eq!(
            err.original().map(PipelineError::message),
            Some("Failed to send message to Telegram, Unauthorized")
        );
        assert_eq!(
            fallback.all(),
            vec!["Failed to send message to Telegram, Unauthorized"]
        );
    }
}
