use thiserror::Error;

use nrgrip_lib::{ExtractError, NrgError};

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The image could not be parsed
    #[error("{0}")]
    Parse(#[from] NrgError),

    /// Extraction could not run
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Some tracks were not extracted
    #[error("{0} track(s) could not be extracted")]
    TracksFailed(usize),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the image itself is malformed, as opposed to unreadable.
    pub(crate) fn is_format_error(&self) -> bool {
        match self {
            Self::Parse(e) | Self::Extract(ExtractError::Parse(e)) => e.is_format_error(),
            _ => false,
        }
    }
}
