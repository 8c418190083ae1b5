//! Error types for the mountain car crate

use thiserror::Error;

/// Main error type for the mountain car crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid action {action} (expected 0, 1 or 2)")]
    InvalidAction { action: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("state has {got} dimensions but the tile coder was built for {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("visualizer unavailable: {reason}")]
    VisualizerUnavailable { reason: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
