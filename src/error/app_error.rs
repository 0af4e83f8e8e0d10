use super::RunError;
use crate::config::error::ConfigError;
use thiserror::Error;

/// Application-wide error type for everything outside the delivery pipeline.
///
/// Pipeline stages report through [`PipelineError`](super::PipelineError);
/// this type covers configuration, logger setup and CLI validation, where a
/// failure means the pipeline never starts, plus the run's terminal outcome.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The pipeline ran and failed; already reported through the fallback
    /// channel when possible
    #[error(transparent)]
    Run(#[from] RunError),

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation_error_keeps_field_as_key() {
        let err: AppError = ConfigError::validation("http.timeout", "must be positive").into();
        match err {
            AppError::Configuration { key, source } => {
                assert_eq!(key, "http.timeout");
                assert!(source.to_string().contains("must be positive"));
            }
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_run_error_is_transparent() {
        let err: AppError = RunError::Escalated(crate::error::PipelineError::fetch("Quote is empty")).into();
        assert_eq!(err.to_string(), "Quote is empty");
    }

    #[test]
    fn test_other_config_errors_use_settings_key() {
        let err: AppError = ConfigError::file_not_found("config/default.toml").into();
        assert_eq!(err.to_string(), "Configuration error: settings");
    }
}
