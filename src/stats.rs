use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Shared run accounting, updated by batches as captures finish.
///
/// Cheap enough to read while a run is in flight; the CLI's progress
/// reporter polls it on an interval.
pub struct RunStats {
    total: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    started: Instant,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            total: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    /// Set once when the run begins, before any batch is launched.
    pub fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
    }

    pub fn record(&self, success: bool) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Accounts a whole batch that never produced per-domain results
    /// (its driver could not be acquired).
    pub fn record_skipped(&self, count: usize) {
        self.completed.fetch_add(count, Ordering::Relaxed);
        self.failed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let completed = self.completed.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let elapsed = self.started.elapsed();

        let rate = if elapsed.as_secs_f64() > 0.0 {
            completed as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        let eta = if rate > 0.0 && completed < total {
            Some(Duration::from_secs_f64(
                (total - completed) as f64 / rate,
            ))
        } else {
            None
        };

        ProgressSnapshot {
            total,
            completed,
            failed,
            succeeded: completed - failed,
            elapsed,
            rate,
            eta,
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub succeeded: usize,
    pub elapsed: Duration,
    pub rate: f64,
    pub eta: Option<Duration>,
}
