//! Core value types flowing through the pipeline

use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// A discovered file considered for inclusion.
///
/// Carries the metadata captured during the walk, when the walker had it,
/// so the size gate does not stat the file a second time.
#[derive(Debug, Clone)]
pub struct Candidate {
    path: PathBuf,
    metadata: Option<Metadata>,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(path: impl Into<PathBuf>, metadata: Metadata) -> Self {
        Self {
            path: path.into(),
            metadata: Some(metadata),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cached_metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Cached metadata, or a fresh `stat` (following symlinks)
    pub fn metadata(&self) -> std::io::Result<Metadata> {
        match &self.metadata {
            Some(metadata) => Ok(metadata.clone()),
            None => std::fs::metadata(&self.path),
        }
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Lifecycle of one pipeline invocation. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PipelineState {
    Idle = 0,
    Discovering = 1,
    Filtering = 2,
    Draining = 3,
    Closed = 4,
}

impl PipelineState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => PipelineState::Idle,
            1 => PipelineState::Discovering,
            2 => PipelineState::Filtering,
            3 => PipelineState::Draining,
            _ => PipelineState::Closed,
        }
    }
}
