use super::filters::FilterKind;
use super::filters::size::DEFAULT_MAX_FILE_SIZE;
use super::filters::text::FILE_HEADER_SAMPLE_SIZE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for one scan invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Filter workers; `None` means one per CPU
    pub concurrency: Option<usize>,
    /// Largest accepted file, in bytes
    pub max_file_size: u64,
    /// Bytes sampled for text detection
    pub header_sample_size: usize,
    /// File names read as ignore-rule files under every root
    pub ignore_filenames: Vec<String>,
    /// Bare names excluded anywhere in the tree
    pub exclude: Vec<String>,
    /// Filter chain, in evaluation order
    pub filters: Vec<FilterKind>,
    pub follow_symlinks: bool,
    /// Wall-clock bound on the whole run
    pub timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            header_sample_size: FILE_HEADER_SAMPLE_SIZE,
            ignore_filenames: vec![".gitignore".to_string()],
            exclude: Vec::new(),
            filters: vec![FilterKind::Size, FilterKind::Text],
            follow_symlinks: false,
            timeout_secs: 5,
        }
    }
}

impl ScanConfig {
    /// Worker count actually used, never zero
    pub fn effective_concurrency(&self) -> usize {
        match self.concurrency {
            Some(n) if n > 0 => n,
            _ => num_cpus::get().max(1),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
