//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Delivers a love quote through a notification channel
#[derive(Parser, Debug)]
#[command(name = "lqt")]
#[command(about = "lqt is a quote notifier service")]
#[command(long_about = "
lqt fetches a love quote, translates it and delivers it through a
notification channel. If any step fails, the error is shown as a desktop
notification instead.

EXAMPLES:
    # Send today's quote to the Telegram group
    lqt notify

    # Send it as a desktop notification, untranslated
    lqt notify --channel desktop --no-translate

    # Use the Telegram test chat and print stage timings
    lqt --debug notify

    # Check configuration and channel name without sending anything
    lqt notify --channel sms --dry-run

CREDENTIALS (environment, or a .env file):
    X_RAPIDAPI_KEY, GCP_API_KEY, TELEGRAM_BOT_API_TOKEN, TELEGRAM_GROUP_ID,
    TELEGRAM_TEST_CHAT_ID, SMS_TOPIC_ARN
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Use a single TOML file instead of the layered `config/` directory.
    /// The file must exist and be readable.
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` layer is loaded.
    ///
    /// Available values: development (dev), production (prod), test
    #[arg(short, long, global = true, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Debug mode
    ///
    /// Prints the time taken by every pipeline stage and sends Telegram
    /// messages to TELEGRAM_TEST_CHAT_ID instead of the group.
    #[arg(short, long, global = true)]
    pub debug: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a quote and deliver it
    ///
    /// Examples:
    ///   lqt notify                       # Telegram, translated
    ///   lqt notify --channel os          # Desktop notification
    ///   lqt notify --dry-run             # Validate without sending
    Notify {
        /// Delivery channel: desktop (os), telegram (chat) or sms
        ///
        /// Matched case-insensitively. An unknown name is reported through
        /// the desktop fallback channel.
        #[arg(long, value_name = "NAME", default_value = "telegram", value_parser = super::validation::validate_channel_name)]
        channel: String,

        /// Deliver the quote in its original language
        #[arg(long)]
        no_translate: bool,

        /// Validate configuration and the channel name, then exit
        #[arg(long)]
        dry_run: bool,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}
