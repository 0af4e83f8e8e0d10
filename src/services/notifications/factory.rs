//! Builds channels from user-supplied names.

use super::channel::{Channel, ChannelKind};
use super::desktop_provider::{DesktopChannel, NotifyCommand};
use super::sms_provider::SmsChannel;
use super::telegram_provider::TelegramChannel;
use crate::config::Settings;
use crate::config::settings::{DesktopConfig, SmsConfig, TelegramConfig};
use crate::error::PipelineError;

pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_BOT_API_TOKEN";
pub const TELEGRAM_GROUP_ID_ENV: &str = "TELEGRAM_GROUP_ID";
pub const TELEGRAM_TEST_CHAT_ID_ENV: &str = "TELEGRAM_TEST_CHAT_ID";
pub const SMS_TOPIC_ARN_ENV: &str = "SMS_TOPIC_ARN";

/// Secrets the channels need, read from the process environment.
///
/// Missing values are kept as empty/`None`; the transport rejects them at
/// delivery time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelCredentials {
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub sms_topic_arn: Option<String>,
}

impl ChannelCredentials {
    /// Read credentials. With `debug` set, messages go to the test chat.
    pub fn from_env(debug: bool) -> Self {
        let chat_id_var = if debug {
            TELEGRAM_TEST_CHAT_ID_ENV
        } else {
            TELEGRAM_GROUP_ID_ENV
        };

        Self {
            telegram_token: std::env::var(TELEGRAM_TOKEN_ENV).unwrap_or_default(),
            telegram_chat_id: std::env::var(chat_id_var).unwrap_or_default(),
            sms_topic_arn: std::env::var(SMS_TOPIC_ARN_ENV).ok(),
        }
    }
}

/// Maps channel names to constructed channels. Never touches the network.
pub struct ChannelFactory {
    client: reqwest::Client,
    telegram: TelegramConfig,
    sms: SmsConfig,
    desktop: DesktopConfig,
    debug: bool,
}

impl ChannelFactory {
    pub fn new(settings: &Settings, client: reqwest::Client, debug: bool) -> Self {
        Self {
            client,
            telegram: settings.telegram.clone(),
            sms: settings.sms.clone(),
            desktop: settings.desktop.clone(),
            debug,
        }
    }

    /// Resolve `name` and build the channel with credentials from the environment
    pub fn create(&self, name: &str) -> Result<Channel, PipelineError> {
        let kind = ChannelKind::from_name(name)?;
        Ok(self.build(kind, &ChannelCredentials::from_env(self.debug)))
    }

    /// Build a channel of `kind` from explicit credentials
    pub fn build(&self, kind: ChannelKind, credentials: &ChannelCredentials) -> Channel {
        match kind {
            ChannelKind::Desktop => Channel::Desktop(self.desktop_channel()),
            ChannelKind::Chat => Channel::Chat(TelegramChannel::new(
                self.client.clone(),
                self.telegram.api_base.clone(),
                credentials.telegram_token.clone(),
                credentials.telegram_chat_id.clone(),
            )),
            ChannelKind::Sms => Channel::Sms(SmsChannel::new(
                credentials.sms_topic_arn.clone(),
                self.sms.region.clone(),
            )),
        }
    }

    /// The fallback channel. Needs no credentials.
    pub fn desktop_channel(&self) -> DesktopChannel {
        let command = match &self.desktop.command {
            Some(program) if !program.trim().is_empty() => NotifyCommand::Program(program.clone()),
            _ => NotifyCommand::platform_default(),
        };
        DesktopChannel::new(self.desktop.summary.clone(), command)
    }
}
