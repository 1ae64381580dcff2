use crate::{
    capture_domain, CaptureError, CaptureResult, Config, DriverFactory, DriverGuard, RunStats,
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error};

/// Runs one batch: acquires a single driver session, fans the batch's
/// domains out as concurrent capture tasks against it, and releases the
/// session after every task has finished. Results come back in the batch's
/// input order.
///
/// A failure to establish the session fails only this batch: it is logged,
/// accounted as skipped, and an empty result set is returned so sibling
/// batches keep running.
pub async fn run_batch(
    domains: Vec<String>,
    batch_start: usize,
    factory: Arc<dyn DriverFactory>,
    config: Config,
    stats: Arc<RunStats>,
) -> Vec<CaptureResult> {
    let guard = match factory.launch().await {
        Ok(driver) => DriverGuard::new(driver),
        Err(e) => {
            error!(
                "Batch at offset {} could not acquire a driver, skipping {} domains: {}",
                batch_start,
                domains.len(),
                e
            );
            stats.record_skipped(domains.len());
            return Vec::new();
        }
    };

    debug!(
        "Batch at offset {} capturing {} domains",
        batch_start,
        domains.len()
    );

    let mut handles = Vec::with_capacity(domains.len());
    for domain in &domains {
        let session = guard.session();
        let domain = domain.clone();
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            capture_domain(&session, &domain, &config).await
        }));
    }

    let mut results = Vec::with_capacity(domains.len());
    for (domain, joined) in domains.into_iter().zip(join_all(handles).await) {
        let result = match joined {
            Ok(result) => result,
            Err(e) => {
                // A panicked capture task fails its own domain only.
                error!("Capture task for {} aborted: {}", domain, e);
                CaptureResult::failed(
                    domain,
                    CaptureError::CaptureFailed(format!("capture task aborted: {e}")),
                )
            }
        };
        stats.record(result.success);
        results.push(result);
    }

    guard.release().await;
    results
}
