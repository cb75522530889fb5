//! Error taxonomy for the discovery pipeline
//!
//! Only configuration problems and a complete inability to start discovery
//! surface as `ScanError` to the caller. Per-root and per-file failures are
//! logged and counted in [`ScanStats`](super::ScanStats) instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// A user exclusion was a path (or `.`/`..`) instead of a bare name
    #[error("paths are not allowed in exclude rules: {name:?}")]
    PathNotAllowed { name: String },

    /// None of the requested roots could be stat'ed
    #[error("no usable input paths to scan")]
    NoUsableRoots,

    /// A rule could not be compiled into the matcher
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    /// An ignore file was found but could not be read
    #[error("failed to read ignore file {}: {source}", path.display())]
    RuleFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed below a root
    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },
}

impl ScanError {
    /// Validation errors are raised before any filesystem work starts
    pub fn is_validation(&self) -> bool {
        matches!(self, ScanError::PathNotAllowed { .. })
    }
}

pub type ScanResult<T> = std::result::Result<T, ScanError>;
