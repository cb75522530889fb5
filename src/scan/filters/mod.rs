//! Candidate filters
//!
//! Every filter answers one question about a [`Candidate`]: keep it or drop
//! it. Filters are pure predicates, so the pipeline can run them from any
//! worker thread and in any order; the configured order only matters for
//! cost, which is why the cheap metadata check goes first:
//!
//! 1. **Size** - stat only
//! 2. **Text** - reads a bounded header sample
//! 3. **Extension / Noise / Glob** - path-only catalog checks
//!
//! Errors never escape a filter. A file that cannot be stat'ed or read is
//! dropped, since it could not be uploaded either.

pub mod extension;
pub mod glob;
pub mod noise;
pub mod size;
pub mod text;

pub use extension::ExtensionFilter;
pub use glob::GlobFilter;
pub use noise::NoisePathFilter;
pub use size::SizeFilter;
pub use text::{TextClass, TextFilter, is_text_content};

use super::types::Candidate;
use serde::{Deserialize, Serialize};

/// Decision for a single candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Keep this candidate
    Process,
    /// Drop this candidate with a reason
    Skip(&'static str),
}

/// A predicate over candidates
pub trait FileFilter: Send + Sync {
    /// Name of this filter for logging
    fn name(&self) -> &'static str;

    /// Classify the candidate
    fn filter(&self, candidate: &Candidate) -> FilterDecision;

    /// `true` when the candidate should be dropped
    fn filter_out(&self, candidate: &Candidate) -> bool {
        matches!(self.filter(candidate), FilterDecision::Skip(_))
    }
}

/// Filters selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    Size,
    Text,
    Extension,
    Noise,
    Glob,
}

/// Run `filters` in order and return the first rejection, if any
pub fn first_rejection(
    filters: &[std::sync::Arc<dyn FileFilter>],
    candidate: &Candidate,
) -> Option<(&'static str, &'static str)> {
    filters.iter().find_map(|filter| match filter.filter(candidate) {
        FilterDecision::Process => None,
        FilterDecision::Skip(reason) => Some((filter.name(), reason)),
    })
}
