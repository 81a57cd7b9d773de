//! Error types for stockwatch

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using stockwatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for stockwatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart rendering failed; the run cannot continue
    #[error("Failed to render chart at {}: {source}", .path.display())]
    Render {
        /// Requested output file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a render error for the given output path
    pub fn render(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Render {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
