//! Error taxonomy shared by the aggregator, writer, config and replay layers.

use std::path::PathBuf;

/// Coarse classification used by callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    State,
    Io,
    Validation,
    Config,
    Input,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("`{operation}` is not allowed while the report is {state}")]
    State {
        operation: &'static str,
        state: &'static str,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Xml(String),

    #[error("invalid finding: {0}")]
    Validation(String),

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("invalid event stream {path}: {message}")]
    Input { path: PathBuf, message: String },
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::State { .. } => ErrorKind::State,
            Self::Io { .. } | Self::Xml(_) => ErrorKind::Io,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config { .. } => ErrorKind::Config,
            Self::Input { .. } => ErrorKind::Input,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
