//! Regex-based noise path filtering

use super::{FileFilter, FilterDecision};
use crate::scan::static_data::NOISE_REGEXES;
use crate::scan::types::Candidate;
use regex::RegexSet;
use std::sync::{Arc, LazyLock};

/// Noise catalog compiled once and shared by every filter instance
static NOISE_SET: LazyLock<Arc<RegexSet>> = LazyLock::new(|| {
    let start_time = std::time::Instant::now();
    match RegexSet::new(NOISE_REGEXES) {
        Ok(set) => {
            tracing::debug!(
                "Compiled {} noise path patterns in {:?}",
                set.len(),
                start_time.elapsed()
            );
            Arc::new(set)
        }
        Err(e) => {
            tracing::error!("Failed to compile noise path patterns: {}", e);
            Arc::new(RegexSet::empty())
        }
    }
});

/// Noise Path Filter - drops vendored, generated and lockfile paths
///
/// The regex form of the built-in noise catalog. Paths are matched in
/// `/`-separated form so the catalog behaves the same on every platform.
#[derive(Debug, Clone)]
pub struct NoisePathFilter {
    patterns: Arc<RegexSet>,
}

impl NoisePathFilter {
    pub fn new() -> Self {
        Self {
            patterns: NOISE_SET.clone(),
        }
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_noise(&self, path: &str) -> bool {
        self.patterns.is_match(path)
    }
}

impl Default for NoisePathFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileFilter for NoisePathFilter {
    fn name(&self) -> &'static str {
        "NoisePathFilter"
    }

    fn filter(&self, candidate: &Candidate) -> FilterDecision {
        let path = candidate.path().to_string_lossy().replace('\\', "/");
        if self.is_noise(&path) {
            FilterDecision::Skip("noise-path")
        } else {
            FilterDecision::Process
        }
    }
}
