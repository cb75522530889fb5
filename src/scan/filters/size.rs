//! File size gate

use super::{FileFilter, FilterDecision};
use crate::scan::types::Candidate;

/// Default ceiling: 50 MB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50_000_000;

/// Size Filter - drops empty files and files above the ceiling
///
/// Uses the metadata captured during the walk when available, otherwise a
/// single `stat`. A file exactly at the ceiling is kept.
#[derive(Debug, Clone)]
pub struct SizeFilter {
    max_file_size: u64,
}

impl SizeFilter {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

impl Default for SizeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

impl FileFilter for SizeFilter {
    fn name(&self) -> &'static str {
        "SizeFilter"
    }

    fn filter(&self, candidate: &Candidate) -> FilterDecision {
        let metadata = match candidate.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(
                    "Failed to get file stats for {}: {}",
                    candidate.path().display(),
                    e
                );
                return FilterDecision::Skip("stat-failed");
            }
        };

        if !metadata.is_file() {
            return FilterDecision::Skip("not-a-file");
        }

        match metadata.len() {
            0 => FilterDecision::Skip("empty"),
            size if size > self.max_file_size => FilterDecision::Skip("too-large"),
            _ => FilterDecision::Process,
        }
    }
}
