//! Discovery and filter stages wired into one streaming pipeline
//!
//! ```text
//!  roots ──▶ walker (root 1) ─┐
//!        ──▶ walker (root 2) ─┼─▶ merged candidates (bounded 100) ─▶ worker × N ─▶ accepted paths
//!        ──▶ walker (root n) ─┘                                                    (bounded N)
//! ```
//!
//! Both stages run at the same time for the whole invocation. Every
//! blocking send and receive goes through the [`ScanContext`], so a
//! cancelled or expired context unwinds all threads and closes the output.
//!
//! State: `Idle → Discovering → Filtering → Draining → Closed`. `Draining`
//! is entered when the merged channel closes, `Closed` when the output does.

pub mod discovery;
pub mod workers;

pub use discovery::{DiscoveryStream, MERGED_CHANNEL_CAPACITY};
pub use workers::FilterPipeline;

use super::config::ScanConfig;
use super::context::ScanContext;
use super::errors::{ScanError, ScanResult};
use super::filters::{
    ExtensionFilter, FileFilter, FilterKind, GlobFilter, NoisePathFilter, SizeFilter, TextFilter,
};
use super::ignore_rules::IgnoreRuleSource;
use super::matcher::GlobExclusionSet;
use super::stats::{ScanStats, StatsCollector};
use super::types::PipelineState;
use crossbeam::channel::Receiver;
use std::path::PathBuf;
use std::sync::Arc;

/// Immutable scan configuration, built once per invocation
#[derive(Debug, Clone)]
pub struct Pipeline {
    exclusions: GlobExclusionSet,
    ignore_filenames: Vec<String>,
    concurrency: usize,
    follow_symlinks: bool,
    chain: FilterChain,
}

#[derive(Clone)]
enum FilterChain {
    Kinds {
        kinds: Vec<FilterKind>,
        max_file_size: u64,
        header_sample_size: usize,
    },
    Custom(Vec<Arc<dyn FileFilter>>),
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterChain::Kinds { kinds, .. } => f.debug_tuple("Kinds").field(kinds).finish(),
            FilterChain::Custom(filters) => f
                .debug_tuple("Custom")
                .field(&filters.iter().map(|f| f.name()).collect::<Vec<_>>())
                .finish(),
        }
    }
}

impl Pipeline {
    /// Validate `config` and build the pipeline.
    ///
    /// Exclusion names are checked here, so a bad name fails before any
    /// filesystem work is done.
    pub fn new(config: &ScanConfig) -> ScanResult<Self> {
        let exclusions = GlobExclusionSet::compile(&[], &config.exclude)?;

        Ok(Self {
            exclusions,
            ignore_filenames: config.ignore_filenames.clone(),
            concurrency: config.effective_concurrency(),
            follow_symlinks: config.follow_symlinks,
            chain: FilterChain::Kinds {
                kinds: config.filters.clone(),
                max_file_size: config.max_file_size,
                header_sample_size: config.header_sample_size,
            },
        })
    }

    /// Replace the configured chain with explicit filters, run in order
    pub fn with_filters(mut self, filters: Vec<Arc<dyn FileFilter>>) -> Self {
        self.chain = FilterChain::Custom(filters);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn exclusions(&self) -> &GlobExclusionSet {
        &self.exclusions
    }

    /// Start discovery and filtering over `roots`.
    ///
    /// Returns an error only when no root can be used; every other failure
    /// shrinks the result instead. The stream ends when all candidates have
    /// been decided or `ctx` ends, whichever is first.
    pub fn filter(&self, ctx: &ScanContext, roots: &[PathBuf]) -> ScanResult<AcceptedFiles> {
        let filters = self.build_chain(roots)?;
        let stats = Arc::new(StatsCollector::new());

        let discovery = DiscoveryStream::new(
            self.exclusions.clone(),
            IgnoreRuleSource::new(&self.ignore_filenames, self.concurrency),
            self.follow_symlinks,
        );
        let candidates = discovery.start(ctx, roots, &stats)?;

        let pool = FilterPipeline::new(filters, self.concurrency);
        tracing::debug!(
            "Filtering with {} workers: {:?}",
            pool.concurrency(),
            pool.filter_names()
        );
        let rx = pool.start(ctx, candidates, &stats);

        Ok(AcceptedFiles {
            rx,
            stats,
            ctx: ctx.clone(),
        })
    }

    fn build_chain(&self, roots: &[PathBuf]) -> ScanResult<Vec<Arc<dyn FileFilter>>> {
        let (kinds, max_file_size, header_sample_size) = match &self.chain {
            FilterChain::Custom(filters) => return Ok(filters.clone()),
            FilterChain::Kinds {
                kinds,
                max_file_size,
                header_sample_size,
            } => (kinds, *max_file_size, *header_sample_size),
        };

        kinds
            .iter()
            .map(|kind| {
                let filter: Arc<dyn FileFilter> = match kind {
                    FilterKind::Size => Arc::new(SizeFilter::new(max_file_size)),
                    FilterKind::Text => Arc::new(TextFilter::new(header_sample_size)),
                    FilterKind::Extension => Arc::new(ExtensionFilter::default()),
                    FilterKind::Noise => Arc::new(NoisePathFilter::new()),
                    FilterKind::Glob => Arc::new(GlobFilter::for_roots(roots, &self.exclusions)?),
                };
                Ok::<_, ScanError>(filter)
            })
            .collect()
    }
}

/// Lazy, single-use stream of accepted paths
///
/// Paths keep the form discovery produced them in: the root as given,
/// joined with the path below it. No order is guaranteed.
#[derive(Debug)]
pub struct AcceptedFiles {
    rx: Receiver<PathBuf>,
    stats: Arc<StatsCollector>,
    ctx: ScanContext,
}

impl AcceptedFiles {
    pub fn state(&self) -> PipelineState {
        self.stats.state()
    }

    pub fn stats(&self) -> ScanStats {
        self.stats.snapshot()
    }

    /// Pipeline threads still running
    pub fn active_tasks(&self) -> usize {
        self.stats.active_tasks()
    }

    /// Why the stream ended early, if it did
    pub fn interrupted(&self) -> Option<super::context::ContextError> {
        self.ctx.error()
    }
}

impl Iterator for AcceptedFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        self.rx.recv().ok()
    }
}
