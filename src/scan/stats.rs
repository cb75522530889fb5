//! Pipeline statistics
//!
//! Lock-free counters shared by the discovery and filter threads, plus the
//! forward-only state machine and a live-thread gauge.

use super::types::PipelineState;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub roots_requested: usize,
    pub roots_failed: usize,
    pub files_discovered: usize,
    pub files_excluded_by_rules: usize,
    pub files_filtered_out: usize,
    pub files_accepted: usize,
}

impl ScanStats {
    /// Candidates that reached the filter stage but were neither accepted
    /// nor rejected, i.e. abandoned because of cancellation
    pub fn files_abandoned(&self) -> usize {
        self.files_discovered
            .saturating_sub(self.files_filtered_out + self.files_accepted)
    }
}

#[derive(Debug)]
pub(crate) struct StatsCollector {
    roots_requested: AtomicUsize,
    roots_failed: AtomicUsize,
    files_discovered: AtomicUsize,
    files_excluded_by_rules: AtomicUsize,
    files_filtered_out: AtomicUsize,
    files_accepted: AtomicUsize,
    state: AtomicU8,
    active_tasks: AtomicUsize,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            roots_requested: AtomicUsize::new(0),
            roots_failed: AtomicUsize::new(0),
            files_discovered: AtomicUsize::new(0),
            files_excluded_by_rules: AtomicUsize::new(0),
            files_filtered_out: AtomicUsize::new(0),
            files_accepted: AtomicUsize::new(0),
            state: AtomicU8::new(PipelineState::Idle as u8),
            active_tasks: AtomicUsize::new(0),
        }
    }

    pub fn add_roots_requested(&self, count: usize) {
        self.roots_requested.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_roots_failed(&self) {
        self.roots_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_discovered(&self) {
        self.files_discovered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_excluded_by_rules(&self) {
        self.files_excluded_by_rules.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_filtered_out(&self) {
        self.files_filtered_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_accepted(&self) {
        self.files_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Move the state machine forward; never moves it back
    pub fn advance(&self, state: PipelineState) {
        self.state.fetch_max(state as u8, Ordering::AcqRel);
    }

    pub fn state(&self) -> PipelineState {
        PipelineState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn active_tasks(&self) -> usize {
        self.active_tasks.load(Ordering::Acquire)
    }

    /// Register a thread before spawning it; the gauge drops when the
    /// guard (moved into the thread) does
    pub fn task_guard(self: &Arc<Self>) -> TaskGuard {
        self.active_tasks.fetch_add(1, Ordering::AcqRel);
        TaskGuard {
            stats: Arc::clone(self),
        }
    }

    pub fn snapshot(&self) -> ScanStats {
        ScanStats {
            roots_requested: self.roots_requested.load(Ordering::Relaxed),
            roots_failed: self.roots_failed.load(Ordering::Relaxed),
            files_discovered: self.files_discovered.load(Ordering::Relaxed),
            files_excluded_by_rules: self.files_excluded_by_rules.load(Ordering::Relaxed),
            files_filtered_out: self.files_filtered_out.load(Ordering::Relaxed),
            files_accepted: self.files_accepted.load(Ordering::Relaxed),
        }
    }
}

pub(crate) struct TaskGuard {
    stats: Arc<StatsCollector>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.stats.active_tasks.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_only_moves_forward() {
        let stats = StatsCollector::new();
        assert_eq!(stats.state(), PipelineState::Idle);
        stats.advance(PipelineState::Draining);
        stats.advance(PipelineState::Filtering);
        assert_eq!(stats.state(), PipelineState::Draining);
        stats.advance(PipelineState::Closed);
        assert_eq!(stats.state(), PipelineState::Closed);
    }

    #[test]
    fn test_task_guard_tracks_live_tasks() {
        let stats = Arc::new(StatsCollector::new());
        {
            let _a = stats.task_guard();
            let _b = stats.task_guard();
            assert_eq!(stats.active_tasks(), 2);
        }
        assert_eq!(stats.active_tasks(), 0);
    }

    #[test]
    fn test_snapshot_and_abandoned() {
        let stats = StatsCollector::new();
        stats.add_roots_requested(2);
        for _ in 0..5 {
            stats.increment_files_discovered();
        }
        stats.increment_files_accepted();
        stats.increment_files_filtered_out();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.roots_requested, 2);
        assert_eq!(snapshot.files_discovered, 5);
        assert_eq!(snapshot.files_abandoned(), 3);
    }
}
