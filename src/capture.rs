use crate::{resize_to_width, CaptureError, Config, Driver};
use metrics::{counter, histogram};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};
use url::Url;

/// Per-domain outcome, collected for aggregate accounting only.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub domain: String,
    pub success: bool,
    pub error: Option<CaptureError>,
}

impl CaptureResult {
    pub fn ok(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(domain: impl Into<String>, error: CaptureError) -> Self {
        Self {
            domain: domain.into(),
            success: false,
            error: Some(error),
        }
    }
}

/// Prefixes `https://` unless the domain already carries an explicit scheme.
pub fn normalize_url(domain: &str) -> String {
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}

/// Deterministic output location for a domain: every `.` becomes `_`, with a
/// `.png` suffix, inside `output_dir`.
pub fn output_path(output_dir: &Path, domain: &str) -> PathBuf {
    output_dir.join(format!("{}.png", domain.replace('.', "_")))
}

/// Runs the capture pipeline for one domain against the batch's shared
/// session and folds any failure into the domain's [`CaptureResult`].
/// Failures are logged here and never propagate to sibling captures.
pub async fn capture_domain(
    session: &Mutex<Box<dyn Driver>>,
    domain: &str,
    config: &Config,
) -> CaptureResult {
    let output = output_path(&config.output_dir, domain);
    let started = Instant::now();

    match capture(session, domain, &output, config).await {
        Ok(()) => {
            histogram!(
                "capture_duration_seconds",
                started.elapsed().as_secs_f64()
            );
            counter!("captures_succeeded_total", 1);
            info!("Captured {} -> {}", domain, output.display());
            CaptureResult::ok(domain)
        }
        Err(e) => {
            counter!("captures_failed_total", 1, "stage" => e.stage());
            warn!("Capture failed for {}: {}", domain, e);
            CaptureResult::failed(domain, e)
        }
    }
}

/// Navigate, settle, screenshot, resize.
///
/// A session renders one page at a time, so the session lock spans navigate
/// through screenshot: capturing after another domain navigated would persist
/// the wrong render. The resize runs after the lock is dropped and overlaps
/// with sibling domains' navigation.
pub async fn capture(
    session: &Mutex<Box<dyn Driver>>,
    domain: &str,
    output: &Path,
    config: &Config,
) -> Result<(), CaptureError> {
    let url = normalize_url(domain);
    Url::parse(&url)
        .map_err(|e| CaptureError::NavigationFailed(format!("invalid URL {url}: {e}")))?;

    {
        let mut driver = session.lock().await;

        timeout(config.capture_timeout, driver.navigate(&url))
            .await
            .map_err(|_| {
                CaptureError::NavigationFailed(format!(
                    "timed out after {:?}",
                    config.capture_timeout
                ))
            })??;

        sleep(config.settle_delay).await;

        timeout(config.capture_timeout, driver.save_screenshot(output))
            .await
            .map_err(|_| {
                CaptureError::CaptureFailed(format!(
                    "timed out after {:?}",
                    config.capture_timeout
                ))
            })??;
    }

    resize_to_width(output).map_err(|e| CaptureError::ResizeFailed(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domains_get_https_prefixed() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
    }

    #[test]
    fn explicit_schemes_pass_through() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn output_names_replace_every_dot() {
        let dir = Path::new("img");
        assert_eq!(output_path(dir, "a.com"), dir.join("a_com.png"));
        assert_eq!(
            output_path(dir, "sub.example.co.uk"),
            dir.join("sub_example_co_uk.png")
        );
    }
}
