//! Top-level run coordination.
//!
//! Partitions the domain list into contiguous batches, gives every batch one
//! driver session, and runs the batches concurrently. The driver cap is
//! enforced structurally: at most `driver_cap` batches exist and each owns at
//! most one session.

use crate::{run_batch, CaptureResult, Config, DriverFactory, InputError, RunStats};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info};

pub struct Orchestrator {
    config: Config,
    factory: Arc<dyn DriverFactory>,
    stats: Arc<RunStats>,
}

impl Orchestrator {
    pub fn new(config: Config, factory: Arc<dyn DriverFactory>) -> Self {
        Self {
            config,
            factory,
            stats: Arc::new(RunStats::new()),
        }
    }

    /// Shared accounting handle, safe to poll while a run is in flight.
    pub fn stats(&self) -> Arc<RunStats> {
        self.stats.clone()
    }

    /// Captures every domain in the list and returns per-domain outcomes in
    /// input order.
    ///
    /// An empty list completes immediately without launching a driver or
    /// touching the filesystem. The only fatal error is an unusable output
    /// directory; every capture- and driver-level failure is isolated and
    /// reported through the results instead.
    pub async fn run(&self, domains: Vec<String>) -> Result<Vec<CaptureResult>, InputError> {
        if domains.is_empty() {
            info!("Domain list is empty, nothing to capture");
            return Ok(Vec::new());
        }

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| InputError::unwritable(&self.config.output_dir, e))?;

        self.stats.set_total(domains.len());

        let workers = self.config.driver_cap.max(1);
        let size = batch_size(domains.len(), workers);

        let mut handles = Vec::new();
        for (index, chunk) in domains.chunks(size).enumerate() {
            handles.push(tokio::spawn(run_batch(
                chunk.to_vec(),
                index * size,
                self.factory.clone(),
                self.config.clone(),
                self.stats.clone(),
            )));
        }

        info!(
            "Capturing {} domains across {} drivers (batch size {})",
            domains.len(),
            handles.len(),
            size
        );

        let mut results = Vec::with_capacity(domains.len());
        for joined in join_all(handles).await {
            match joined {
                Ok(mut batch_results) => results.append(&mut batch_results),
                Err(e) => error!("Batch task aborted: {}", e),
            }
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            "Capture run complete: {} succeeded, {} failed, {} skipped",
            succeeded,
            results.len() - succeeded,
            domains.len() - results.len()
        );

        Ok(results)
    }
}

/// Contiguous batch size spreading `domains` across at most `workers`
/// drivers: ceil(domains / workers). The final batch may be shorter.
pub(crate) fn batch_size(domains: usize, workers: usize) -> usize {
    domains.div_ceil(workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_size_is_ceiling_division() {
        assert_eq!(batch_size(3, 2), 2); // batches of 2 and 1
        assert_eq!(batch_size(4, 2), 2);
        assert_eq!(batch_size(5, 2), 3);
        assert_eq!(batch_size(8, 4), 2);
        assert_eq!(batch_size(1, 4), 1);
        assert_eq!(batch_size(2, 4), 1); // more workers than domains
    }

    #[test]
    fn chunking_never_exceeds_worker_count() {
        for (domains, workers) in [(3, 2), (10, 4), (2, 4), (7, 3), (1, 1)] {
            let list: Vec<usize> = (0..domains).collect();
            let chunks = list.chunks(batch_size(domains, workers)).count();
            assert!(
                chunks <= workers,
                "{domains} domains over {workers} workers produced {chunks} batches"
            );
        }
    }
}
