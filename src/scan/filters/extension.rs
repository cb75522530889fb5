//! Binary extension filtering

use super::{FileFilter, FilterDecision};
use crate::scan::static_data::BINARY_EXTENSIONS;
use crate::scan::types::Candidate;
use std::collections::HashSet;

/// Extension Filter - drops image/binary formats by their final extension
///
/// Matching is exact and case-sensitive on the last extension only, so
/// `logo.png` is dropped while `logo.PNG` and `logo.png.txt` are not.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: HashSet<String>,
}

impl ExtensionFilter {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
                .collect(),
        }
    }

    pub fn extensions(&self) -> &HashSet<String> {
        &self.extensions
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(BINARY_EXTENSIONS)
    }
}

impl FileFilter for ExtensionFilter {
    fn name(&self) -> &'static str {
        "ExtensionFilter"
    }

    fn filter(&self, candidate: &Candidate) -> FilterDecision {
        let is_binary = candidate
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(ext));

        if is_binary {
            FilterDecision::Skip("binary-extension")
        } else {
            FilterDecision::Process
        }
    }
}
