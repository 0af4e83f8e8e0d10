//! Notify command handler
//!
//! Wires settings, credentials and collaborators into an
//! `EscalationController` and runs it once.

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::external::{
    GCP_API_KEY_ENV, GoogleTranslator, RAPIDAPI_KEY_ENV, RapidApiQuoteSource, build_http_client,
};
use crate::services::EscalationController;
use crate::services::notifications::{
    ChannelCredentials, ChannelFactory, ChannelKind, Notifier, SMS_TOPIC_ARN_ENV,
    TELEGRAM_GROUP_ID_ENV, TELEGRAM_TEST_CHAT_ID_ENV, TELEGRAM_TOKEN_ENV,
};

/// Options of one `notify` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOptions {
    pub channel: String,
    pub translate: bool,
    pub dry_run: bool,
    pub debug: bool,
}

/// Handler for the notify command
pub struct NotifyCommandHandler {
    config: Settings,
}

impl NotifyCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the notify command
    ///
    /// # Errors
    /// - Configuration errors found before the pipeline starts
    /// - Any terminal failure of the run, escalated or not
    pub async fn execute(&self, options: &NotifyOptions) -> AppResult<()> {
        if options.dry_run {
            return self.validate_only(options);
        }

        let client = build_http_client(&self.config.http)?;
        let factory = ChannelFactory::new(&self.config, client.clone(), options.debug);

        let primary = factory
            .create(&options.channel)
            .map(|channel| Box::new(channel) as Box<dyn Notifier>);
        let fallback = Box::new(factory.desktop_channel());
        let quotes = Box::new(RapidApiQuoteSource::from_env(client.clone(), &self.config.quote));

        let mut controller =
            EscalationController::new(quotes, primary, fallback).with_timings(options.debug);
        if options.translate {
            controller = controller.with_translator(Box::new(GoogleTranslator::from_env(
                client,
                &self.config.translation,
            )));
        }

        tracing::info!(channel = %options.channel, translate = options.translate, "Starting notify run");
        controller.run().await?;
        Ok(())
    }

    /// Validate configuration and the channel name without sending anything
    pub fn validate_only(&self, options: &NotifyOptions) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid");

        let kind = ChannelKind::from_name(&options.channel).map_err(|e| AppError::Validation {
            field: "channel".to_string(),
            reason: e.to_string(),
        })?;
        println!("✓ Channel: {}", kind);

        for (name, present) in self.credential_report(kind, options) {
            let mark = if present { "✓" } else { "✗" };
            println!("{} {} {}", mark, name, if present { "is set" } else { "is not set" });
        }

        println!("Dry run completed - nothing was sent");
        Ok(())
    }

    /// Which credentials the run would use, and whether each is set
    fn credential_report(&self, kind: ChannelKind, options: &NotifyOptions) -> Vec<(&'static str, bool)> {
        let credentials = ChannelCredentials::from_env(options.debug);
        let mut report = vec![(RAPIDAPI_KEY_ENV, env_is_set(RAPIDAPI_KEY_ENV))];

        if options.translate {
            report.push((GCP_API_KEY_ENV, env_is_set(GCP_API_KEY_ENV)));
        }

        match kind {
            ChannelKind::Chat => {
                let chat_var = if options.debug {
                    TELEGRAM_TEST_CHAT_ID_ENV
                } else {
                    TELEGRAM_GROUP_ID_ENV
                };
                report.push((TELEGRAM_TOKEN_ENV, !credentials.telegram_token.is_empty()));
                report.push((chat_var, !credentials.telegram_chat_id.is_empty()));
            }
            ChannelKind::Sms => {
                report.push((SMS_TOPIC_ARN_ENV, credentials.sms_topic_arn.is_some()));
            }
            ChannelKind::Desktop => {}
        }

        report
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

fn env_is_set(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| !value.is_empty())
}
