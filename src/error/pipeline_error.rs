//! Errors raised by the quote pipeline and its terminal outcomes.

use thiserror::Error;

/// A failure in one of the pipeline stages.
///
/// The `Display` output is the bare message so it can be forwarded verbatim
/// to the fallback channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Bad channel name or unusable channel configuration
    #[error("{message}")]
    Config { message: String },

    /// The quote could not be fetched or was empty
    #[error("{message}")]
    Fetch { message: String },

    /// The translation provider failed or returned nothing
    #[error("{message}")]
    Translation { message: String },

    /// A channel rejected or failed to transmit a payload
    #[error("{message}")]
    Delivery { message: String },
}

impl PipelineError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    pub fn translation(message: impl Into<String>) -> Self {
        Self::Translation {
            message: message.into(),
        }
    }

    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }

    /// Short tag used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Config { .. } => "config",
            PipelineError::Fetch { .. } => "fetch",
            PipelineError::Translation { .. } => "translation",
            PipelineError::Delivery { .. } => "delivery",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            PipelineError::Config { message }
            | PipelineError::Fetch { message }
            | PipelineError::Translation { message }
            | PipelineError::Delivery { message } => message,
        }
    }
}

/// Terminal failure of a run.
///
/// Every variant maps to a non-zero exit status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The pipeline failed and the fallback channel reported it
    #[error("{0}")]
    Escalated(PipelineError),

    /// The fallback channel failed while reporting a pipeline error
    #[error("fallback delivery failed: {fallback} (original error: {original})")]
    EscalationFailed {
        original: PipelineError,
        fallback: PipelineError,
    },

    /// The pipeline succeeded but the confirmation could not be delivered
    #[error("confirmation delivery failed: {0}")]
    ConfirmationFailed(PipelineError),
}

impl RunError {
    /// The pipeline error that started the failure, if any
    pub fn original(&self) -> Option<&PipelineError> {
        match self {
            RunError::Escalated(original) | RunError::EscalationFailed { original, .. } => {
                Some(original)
            }
            RunError::ConfirmationFailed(_) => None,
        }
    }
}
