//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{NotifyCommandHandler, NotifyOptions};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// Execute a CLI command with the given settings
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
///
/// # Errors
/// Returns errors from command handlers, including failed runs
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Commands::Notify {
            channel,
            no_translate,
            dry_run,
        } => {
            let options = NotifyOptions {
                channel: channel.clone(),
                translate: !no_translate,
                dry_run: *dry_run,
                debug: cli.debug,
            };
            NotifyCommandHandler::new(settings).execute(&options).await
        }
    }
}
