//! Fixed-size filter worker pool
//!
//! `concurrency` workers share the merged candidate receiver. Each runs
//! the filter chain on a candidate and forwards survivors to the output
//! channel. A closer joins the workers, marks the pipeline `Closed` and
//! drops the last output sender.

use crate::scan::context::ScanContext;
use crate::scan::filters::{FileFilter, first_rejection};
use crate::scan::stats::StatsCollector;
use crate::scan::types::{Candidate, PipelineState};
use crossbeam::channel::{self, Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Worker pool applying an ordered, short-circuiting filter chain
#[derive(Clone)]
pub struct FilterPipeline {
    filters: Arc<[Arc<dyn FileFilter>]>,
    concurrency: usize,
}

impl std::fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPipeline")
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl FilterPipeline {
    pub fn new(filters: Vec<Arc<dyn FileFilter>>, concurrency: usize) -> Self {
        Self {
            filters: filters.into(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Spawn the pool over `candidates` and return the accepted-path
    /// receiver. The output channel holds at most `concurrency` paths.
    pub(crate) fn start(
        &self,
        ctx: &ScanContext,
        candidates: Receiver<Candidate>,
        stats: &Arc<StatsCollector>,
    ) -> Receiver<PathBuf> {
        let (tx, rx) = channel::bounded(self.concurrency);
        stats.advance(PipelineState::Filtering);

        let workers: Vec<JoinHandle<()>> = (0..self.concurrency)
            .map(|worker_id| {
                let guard = stats.task_guard();
                let filters = Arc::clone(&self.filters);
                let ctx = ctx.clone();
                let candidates = candidates.clone();
                let tx = tx.clone();
                let stats = Arc::clone(stats);
                thread::spawn(move || {
                    let _guard = guard;
                    filter_worker(worker_id, &filters, &ctx, &candidates, &tx, &stats);
                })
            })
            .collect();

        let guard = stats.task_guard();
        let stats = Arc::clone(stats);
        thread::spawn(move || {
            let _guard = guard;
            for worker in workers {
                if worker.join().is_err() {
                    tracing::error!("Filter worker panicked");
                }
            }
            stats.advance(PipelineState::Closed);
            tracing::debug!("Filter workers finished, closing output channel");
            drop(tx);
        });

        rx
    }
}

fn filter_worker(
    worker_id: usize,
    filters: &[Arc<dyn FileFilter>],
    ctx: &ScanContext,
    candidates: &Receiver<Candidate>,
    tx: &Sender<PathBuf>,
    stats: &StatsCollector,
) {
    let mut processed = 0usize;

    while let Some(candidate) = ctx.recv(candidates) {
        processed += 1;

        if let Some((filter, reason)) = first_rejection(filters, &candidate) {
            tracing::trace!(
                "{} dropped {} ({})",
                filter,
                candidate.path().display(),
                reason
            );
            stats.increment_files_filtered_out();
            continue;
        }

        if !ctx.send(tx, candidate.into_path()) {
            break;
        }
        stats.increment_files_accepted();
    }

    tracing::trace!("Worker {} exiting after {} candidates", worker_id, processed);
}
