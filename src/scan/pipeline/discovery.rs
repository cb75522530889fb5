//! Per-root discovery fanned into one merged candidate channel
//!
//! One thread per usable root compiles that root's matcher, walks the
//! tree and pushes surviving files into a shared bounded channel. A closer
//! thread owns the last sender: it joins every walker, moves the state
//! machine to `Draining` and then drops the sender, which is what closes
//! the merged channel for the filter workers.

use crate::scan::context::ScanContext;
use crate::scan::errors::{ScanError, ScanResult};
use crate::scan::ignore_rules::IgnoreRuleSource;
use crate::scan::matcher::GlobExclusionSet;
use crate::scan::stats::StatsCollector;
use crate::scan::types::{Candidate, PipelineState};
use crossbeam::channel::{self, Receiver, Sender};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Capacity of the merged candidate channel
pub const MERGED_CHANNEL_CAPACITY: usize = 100;

/// Discovery settings shared by every root's walker
#[derive(Debug, Clone)]
pub struct DiscoveryStream {
    exclusions: Arc<GlobExclusionSet>,
    rule_source: IgnoreRuleSource,
    follow_symlinks: bool,
}

impl DiscoveryStream {
    pub fn new(
        exclusions: GlobExclusionSet,
        rule_source: IgnoreRuleSource,
        follow_symlinks: bool,
    ) -> Self {
        Self {
            exclusions: Arc::new(exclusions),
            rule_source,
            follow_symlinks,
        }
    }

    /// Start one walker per usable root and return the merged channel.
    ///
    /// Roots that cannot be stat'ed are logged and counted; if none are
    /// left this returns [`ScanError::NoUsableRoots`] before any thread is
    /// spawned.
    pub(crate) fn start(
        &self,
        ctx: &ScanContext,
        roots: &[PathBuf],
        stats: &Arc<StatsCollector>,
    ) -> ScanResult<Receiver<Candidate>> {
        stats.add_roots_requested(roots.len());

        let usable: Vec<PathBuf> = roots
            .iter()
            .filter(|root| match std::fs::metadata(root) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("Skipping input path {}: {}", root.display(), e);
                    stats.increment_roots_failed();
                    false
                }
            })
            .cloned()
            .collect();

        if usable.is_empty() {
            return Err(ScanError::NoUsableRoots);
        }

        tracing::debug!(
            "Starting discovery on {} of {} roots",
            usable.len(),
            roots.len()
        );

        let (tx, rx) = channel::bounded(MERGED_CHANNEL_CAPACITY);
        stats.advance(PipelineState::Discovering);

        let walkers: Vec<JoinHandle<()>> = usable
            .into_iter()
            .map(|root| {
                let guard = stats.task_guard();
                let stream = self.clone();
                let ctx = ctx.clone();
                let tx = tx.clone();
                let stats = Arc::clone(stats);
                thread::spawn(move || {
                    let _guard = guard;
                    if let Err(e) = stream.walk_root(&ctx, &root, &tx, &stats) {
                        tracing::warn!("Dropping root {}: {}", root.display(), e);
                        stats.increment_roots_failed();
                    }
                })
            })
            .collect();

        let guard = stats.task_guard();
        let stats = Arc::clone(stats);
        thread::spawn(move || {
            let _guard = guard;
            for walker in walkers {
                if walker.join().is_err() {
                    tracing::error!("Discovery thread panicked");
                }
            }
            stats.advance(PipelineState::Draining);
            tracing::debug!("Discovery finished, closing candidate channel");
            drop(tx);
        });

        Ok(rx)
    }

    /// Walk one root, sending every file the matcher lets through.
    ///
    /// Returns early without error when the context ends or the consumer
    /// goes away; a failed rule discovery or traversal error fails the root.
    fn walk_root(
        &self,
        ctx: &ScanContext,
        root: &Path,
        tx: &Sender<Candidate>,
        stats: &StatsCollector,
    ) -> ScanResult<()> {
        let base = self.exclusions.matcher_for(root, &[])?;
        let rules = self.rule_source.discover(ctx, root, &base)?;
        let matcher = Arc::new(self.exclusions.matcher_for(root, &rules)?);

        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(self.follow_symlinks);

        let prune = Arc::clone(&matcher);
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if entry.depth() == 0 || !is_dir {
                return true;
            }
            let excluded = prune.matches(entry.path(), true);
            if excluded {
                tracing::trace!("Pruned directory {}", entry.path().display());
            }
            !excluded
        });

        for result in builder.build() {
            if ctx.is_done() {
                tracing::debug!("Discovery of {} stopped: {:?}", root.display(), ctx.error());
                return Ok(());
            }

            let entry = match result {
                Ok(entry) => entry,
                Err(err) if is_broken_link(&err) => {
                    tracing::debug!("Skipping unresolvable link under {}: {}", root.display(), err);
                    continue;
                }
                Err(source) => {
                    return Err(ScanError::Walk {
                        root: root.to_path_buf(),
                        source,
                    });
                }
            };

            let Some(file_type) = entry.file_type() else {
                continue;
            };
            // Only regular files and links are candidates; fifos and
            // sockets would block the header read.
            if file_type.is_dir() || !(file_type.is_file() || file_type.is_symlink()) {
                continue;
            }

            if matcher.matches(entry.path(), false) {
                tracing::trace!("Excluded by rule: {}", entry.path().display());
                stats.increment_files_excluded_by_rules();
                continue;
            }

            let metadata = if file_type.is_file() {
                entry.metadata().ok()
            } else {
                None
            };
            let path = entry.into_path();
            let candidate = match metadata {
                Some(metadata) => Candidate::with_metadata(path, metadata),
                None => Candidate::new(path),
            };

            if !ctx.send(tx, candidate) {
                tracing::debug!("Discovery of {} abandoned by consumer", root.display());
                return Ok(());
            }
            stats.increment_files_discovered();
        }

        Ok(())
    }
}

/// Dangling links and link cycles only affect the one entry; anything
/// else (an unreadable directory, say) fails the root.
fn is_broken_link(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::WithPath { err: inner, .. }
        | ignore::Error::WithDepth { err: inner, .. }
        | ignore::Error::WithLineNumber { err: inner, .. } => is_broken_link(inner),
        ignore::Error::Loop { .. } => true,
        ignore::Error::Io(io) => io.kind() == std::io::ErrorKind::NotFound,
        _ => false,
    }
}
