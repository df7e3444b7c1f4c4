// Error types for route table reading and default route resolution

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("failed to read route table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected at least {expected} columns, found {found}")]
    Format {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid {field} field {value:?}: {reason}")]
    Parse {
        line: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using RouteError
pub type RouteResult<T> = Result<T, RouteError>;

impl RouteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RouteError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(
        line: usize,
        field: &'static str,
        value: &str,
        reason: impl ToString,
    ) -> Self {
        RouteError::Parse {
            line,
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Convert error to user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            RouteError::Io { path, .. } => {
                format!(
                    "Could not read {}. Is this a Linux host with procfs mounted?",
                    path.display()
                )
            }
            RouteError::Format { line, .. } => {
                format!("Route table line {} is truncated or not tab separated.", line)
            }
            RouteError::Parse { line, field, .. } => {
                format!("Route table line {} has a malformed {} column.", line, field)
            }
            RouteError::Config(_) => {
                "Configuration error. Check your config file or command-line arguments.".to_string()
            }
        }
    }
}
