//! Error types for the diaglint library.
//!
//! Fatal conditions (configuration, dependency installation, report writing)
//! carry structured context and propagate to the CLI boundary; anything
//! confined to a single file's analysis is downgraded to a recorded issue by
//! the runner instead of surfacing here.

use std::io;

use thiserror::Error;

use crate::io::reports::error::ReportError;

/// Main result type for diaglint operations.
pub type Result<T> = std::result::Result<T, DiaglintError>;

/// Error type for all diaglint operations.
#[derive(Error, Debug)]
pub enum DiaglintError {
    /// I/O related errors (file operations, staging copies, etc.)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors (missing/invalid lintrc, invalid rulesets)
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Diagram import errors
    #[error("Parse error: {message}")]
    Parse {
        /// Error description
        message: String,
        /// File path where the error occurred
        file_path: Option<String>,
    },

    /// Invalid file glob pattern
    #[error("Invalid pattern: {message}")]
    Pattern {
        /// Error description
        message: String,
    },

    /// Dependency installation errors
    #[error("Dependency installation error: {message}")]
    Install {
        /// Error description
        message: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Report generation errors
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
    },
}

impl DiaglintError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            file_path: None,
        }
    }

    /// Create a new parse error with file context
    pub fn parse_in_file(message: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            file_path: Some(file_path.into()),
        }
    }

    /// Create a new pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    /// Create a new installation error
    pub fn install(message: impl Into<String>) -> Self {
        Self::Install {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Implement From traits for common error types
impl From<io::Error> for DiaglintError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for DiaglintError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<walkdir::Error> for DiaglintError {
    fn from(err: walkdir::Error) -> Self {
        Self::io("directory traversal failed", err.into())
    }
}
