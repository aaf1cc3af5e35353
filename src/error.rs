//! Error types for the paging engine

use std::fmt;
use std::io;

/// Result type alias for viewer-core operations
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors that can occur while reading image or feature-file bytes
#[derive(Debug)]
pub enum ViewError {
    /// The backing image or feature file cannot be opened or read
    SourceUnavailable {
        /// Forensic path of the failed request
        path: String,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The read succeeded but produced zero bytes (path beyond EOF,
    /// or the source is currently absent)
    EmptyRead {
        /// Forensic path of the empty request
        path: String,
    },
    /// A feature file is structurally unusable (not a line-record file)
    Malformed(String),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::SourceUnavailable { path, source } => {
                write!(f, "Source unavailable at '{}': {}", path, source)
            }
            ViewError::EmptyRead { path } => {
                write!(f, "No data at '{}'", path)
            }
            ViewError::Malformed(e) => write!(f, "Malformed input: {}", e),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::SourceUnavailable { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for ViewError {
    fn from(err: io::Error) -> Self {
        ViewError::SourceUnavailable {
            path: String::new(),
            source: err,
        }
    }
}

impl ViewError {
    /// True for the informational zero-byte outcome, false for hard failures
    pub fn is_empty_read(&self) -> bool {
        matches!(self, ViewError::EmptyRead { .. })
    }
}
