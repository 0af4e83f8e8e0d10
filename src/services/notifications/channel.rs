use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::desktop_provider::DesktopChannel;
use super::provider::{DeliveryPayload, Notifier};
use super::sms_provider::SmsChannel;
use super::telegram_provider::TelegramChannel;
use crate::error::PipelineError;

/// The closed set of delivery channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Desktop,
    Chat,
    Sms,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Desktop, ChannelKind::Chat, ChannelKind::Sms];

    /// Resolve a user-supplied channel name, ignoring ASCII case.
    ///
    /// Accepts `desktop`/`os`, `telegram`/`chat` and `sms`. Anything else is
    /// a configuration error: `Service <name> isn't valid`.
    pub fn from_name(name: &str) -> Result<Self, PipelineError> {
        match name.to_ascii_lowercase().as_str() {
            "desktop" | "os" => Ok(Self::Desktop),
            "telegram" | "chat" => Ok(Self::Chat),
            "sms" => Ok(Self::Sms),
            _ => Err(PipelineError::config(format!(
                "Service {} isn't valid",
                name
            ))),
        }
    }

    /// Canonical name accepted by [`ChannelKind::from_name`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Chat => "telegram",
            Self::Sms => "sms",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constructed channel of one of the known kinds
#[derive(Clone)]
pub enum Channel {
    Desktop(DesktopChannel),
    Chat(TelegramChannel),
    Sms(SmsChannel),
}

impl Channel {
    pub fn kind(&self) -> ChannelKind {
        match self {
            Self::Desktop(_) => ChannelKind::Desktop,
            Self::Chat(_) => ChannelKind::Chat,
            Self::Sms(_) => ChannelKind::Sms,
        }
    }

    fn as_notifier(&self) -> &dyn Notifier {
        match self {
            Self::Desktop(channel) => channel,
            Self::Chat(channel) => channel,
            Self::Sms(channel) => channel,
        }
    }
}

#[async_trait]
impl Notifier for Channel {
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<(), PipelineError> {
        self.as_notifier().deliver(payload).await
    }

    fn name(&self) -> &'static str {
        self.as_notifier().name()
    }

    fn display_name(&self) -> &'static str {
        self.as_notifier().display_name()
    }
}
