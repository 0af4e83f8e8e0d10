//! Notification channels.
//!
//! The core trait `Notifier` is implemented by the desktop, Telegram and SMS
//! channels. `ChannelFactory` turns a user-supplied name into a `Channel`.

mod channel;
mod desktop_provider;
mod factory;
mod provider;
mod sms_provider;
mod telegram_provider;

pub use channel::{Channel, ChannelKind};
pub use desktop_provider::{DesktopChannel, NotifyCommand};
pub use factory::{
    ChannelCredentials, ChannelFactory, SMS_TOPIC_ARN_ENV, TELEGRAM_GROUP_ID_ENV,
    TELEGRAM_TEST_CHAT_ID_ENV, TELEGRAM_TOKEN_ENV,
};
pub use provider::{DeliveryPayload, Notifier, attribution_label, escape_html};
pub use sms_provider::SmsChannel;
pub use telegram_provider::TelegramChannel;
