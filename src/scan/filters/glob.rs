//! Glob rule filtering as a pipeline stage

use super::{FileFilter, FilterDecision};
use crate::scan::errors::ScanResult;
use crate::scan::matcher::{GlobExclusionSet, MatcherSet};
use crate::scan::types::Candidate;
use std::path::PathBuf;

/// Glob Filter - drops candidates matched by a compiled rule set
///
/// Discovery already applies each root's matcher during the walk, ignore
/// files included. This filter re-checks the root-independent rules (the
/// catalog plus user names) and is mostly useful in custom chains.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    matchers: Vec<MatcherSet>,
}

impl GlobFilter {
    pub fn new(matchers: Vec<MatcherSet>) -> Self {
        Self { matchers }
    }

    /// One matcher per root, each anchored the way discovery anchors it
    pub fn for_roots(roots: &[PathBuf], exclusions: &GlobExclusionSet) -> ScanResult<Self> {
        let matchers = roots
            .iter()
            .map(|root| exclusions.matcher_for(root, &[]))
            .collect::<ScanResult<Vec<_>>>()?;
        Ok(Self::new(matchers))
    }

    fn matcher_for(&self, candidate: &Candidate) -> Option<&MatcherSet> {
        self.matchers
            .iter()
            .filter(|matcher| candidate.path().starts_with(matcher.root()))
            .max_by_key(|matcher| matcher.root().components().count())
            .or_else(|| self.matchers.first())
    }
}

impl FileFilter for GlobFilter {
    fn name(&self) -> &'static str {
        "GlobFilter"
    }

    fn filter(&self, candidate: &Candidate) -> FilterDecision {
        match self.matcher_for(candidate) {
            Some(matcher) if matcher.matches(candidate.path(), false) => {
                FilterDecision::Skip("glob-excluded")
            }
            _ => FilterDecision::Process,
        }
    }
}
