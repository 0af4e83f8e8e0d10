//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use std::path::Path;

use super::parser::Cli;
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

/// Applies CLI overrides on top of file and environment configuration.
///
/// CLI arguments have the highest priority.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration
    ///
    /// # Arguments
    /// * `config_path` - Single configuration file. If None, the layered
    ///   loader (`LQT_CONFIG_DIR` / `LQT_CONFIG_FILE`) is used
    /// * `environment` - Overrides `LQT_APP_ENV` when selecting layers
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_config_path(
        config_path: Option<&Path>,
        environment: Option<crate::config::Environment>,
    ) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };

        let loader = match environment {
            Some(environment) => loader.with_environment(environment),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// # Returns
    /// A new validated Settings instance with CLI overrides applied
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        config.validate()?;

        Ok(config)
    }
}
