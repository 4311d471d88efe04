//! Error kinds for context aggregation.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContextError>;

/// Which budget a [`ContextError::ContextTooLarge`] tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// `max_file_count`
    Files,
    /// `max_total_size`
    Bytes,
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Budget::Files => write!(f, "files"),
            Budget::Bytes => write!(f, "bytes"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("cannot stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is a directory", .path.display())]
    IsDirectory { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("context too large: {actual} {budget} exceeds limit of {limit}")]
    ContextTooLarge {
        budget: Budget,
        actual: usize,
        limit: usize,
    },
}

impl ContextError {
    /// True when the input set must shrink (or the limits grow) before a retry can succeed.
    pub fn is_context_too_large(&self) -> bool {
        matches!(self, ContextError::ContextTooLarge { .. })
    }
}
