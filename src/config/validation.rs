//! Configuration validation logic
//!
//! Validation runs once after all sources are merged, so a bad value is
//! reported before any stage or channel is built.

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{HttpConfig, LoggerSettings, Settings};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl HttpConfig {
    /// Validate HTTP client configuration
    ///
    /// # Validation Rules
    /// - Request and connect timeouts must be greater than 0
    /// - Connect timeout must not exceed the request timeout
    /// - User agent must not be empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "http.timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "http.connect_timeout",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout > self.timeout {
            return Err(ConfigError::ValidationError {
                field: "http.connect_timeout".to_string(),
                message: format!(
                    "Connect timeout ({}) cannot exceed request timeout ({}).",
                    self.connect_timeout, self.timeout
                ),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::validation(
                "http.user_agent",
                "User agent cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger configuration
    ///
    /// # Validation Rules
    /// - Level must be one of trace, debug, info, warn, error
    /// - File format must be one of full, compact, json
    /// - At least one output must be enabled
    /// - File path must not be empty when file output is enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path cannot be empty when file output is enabled.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate the complete settings tree
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.http.validate()?;

        validate_http_url("quote.endpoint", &self.quote.endpoint)?;
        validate_http_url("translation.endpoint", &self.translation.endpoint)?;
        validate_http_url("telegram.api_base", &self.telegram.api_base)?;

        if self.translation.target_language.trim().is_empty() {
            return Err(ConfigError::validation(
                "translation.target_language",
                "Target language cannot be empty.",
            ));
        }

        if self.desktop.summary.trim().is_empty() {
            return Err(ConfigError::validation(
                "desktop.summary",
                "Notification summary cannot be empty.",
            ));
        }

        Ok(())
    }
}

/// Check that `value` parses as an http or https URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::ValidationError {
        field: field.to_string(),
        message: format!("Invalid URL '{}': {}", value, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: format!("URL must use http or https protocol, got '{}'", url.scheme()),
        });
    }

    Ok(())
}
