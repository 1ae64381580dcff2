//! Configuration for the capture pipeline and the Chrome sessions it drives.
//!
//! Defaults mirror how the tool is meant to run unattended: at most four
//! browser drivers (fewer on smaller machines), a fixed post-navigation
//! settle delay, and screenshots collected under `img/`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Hard ceiling on simultaneously live browser drivers. The effective default
/// is this value or the machine's available parallelism, whichever is lower.
pub const DRIVER_CAP: usize = 4;

/// Wait between navigation returning and the screenshot being taken.
/// Navigation completion does not guarantee visual completeness.
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Main configuration for a capture run
///
/// # Examples
///
/// ```rust
/// use domainshot::Config;
///
/// // Use default configuration
/// let config = Config::default();
///
/// // Create custom configuration
/// let config = Config {
///     driver_cap: 2,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Maximum number of concurrently live browser drivers
    ///
    /// One driver serves one batch of domains. Defaults to
    /// [`DRIVER_CAP`] clamped to the machine's available parallelism.
    pub driver_cap: usize,

    /// Wait between navigation and capture (default: [`SETTLE_DELAY`])
    pub settle_delay: Duration,

    /// Upper bound for a single navigation or screenshot round-trip
    /// (default: 30 seconds)
    pub capture_timeout: Duration,

    /// Directory screenshots are written into (default: `img`)
    pub output_dir: PathBuf,

    /// Browser window size used for rendering
    pub viewport: Viewport,

    /// Path to Chrome/Chromium executable (default: auto-detect)
    pub chrome_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver_cap: DRIVER_CAP.min(num_cpus::get().max(1)),
            settle_delay: SETTLE_DELAY,
            capture_timeout: Duration::from_secs(30),
            output_dir: PathBuf::from("img"),
            viewport: Viewport::default(),
            chrome_path: None,
        }
    }
}

/// Browser window size used when rendering pages
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Viewport {
    /// Window width in pixels (default: 1920)
    pub width: u32,

    /// Window height in pixels (default: 1080)
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Unique profile directory for one browser session. Concurrent Chrome
/// processes sharing a profile trip over its singleton lock, so every
/// session id gets its own directory.
pub fn profile_dir(instance_id: usize) -> String {
    format!(
        "/tmp/domainshot-profile-{}-{}",
        std::process::id(),
        instance_id
    )
}

/// Chrome command-line arguments for one headless session
///
/// The profile directory and debugging port embed `instance_id` so that
/// concurrently launched sessions never collide.
///
/// # Examples
///
/// ```rust
/// use domainshot::{chrome_args, Config};
///
/// let config = Config::default();
/// let args = chrome_args(&config, 0);
/// assert!(args.iter().any(|a| a == "--headless"));
/// ```
pub fn chrome_args(config: &Config, instance_id: usize) -> Vec<String> {
    vec![
        "--headless".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--disable-background-timer-throttling".to_string(),
        "--disable-renderer-backgrounding".to_string(),
        "--disable-extensions".to_string(),
        "--disable-default-apps".to_string(),
        "--disable-sync".to_string(),
        "--no-first-run".to_string(),
        format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        ),
        format!("--user-data-dir={}", profile_dir(instance_id)),
        format!("--remote-debugging-port={}", 9222 + instance_id as u32),
    ]
}

/// Builds the chromiumoxide launch configuration for one session.
pub fn browser_config(
    config: &Config,
    instance_id: usize,
) -> Result<chromiumoxide::browser::BrowserConfig, crate::DriverError> {
    use chromiumoxide::browser::BrowserConfig;

    let mut builder = BrowserConfig::builder()
        .window_size(config.viewport.width, config.viewport.height)
        .args(chrome_args(config, instance_id));

    if let Some(chrome_path) = &config.chrome_path {
        builder = builder.chrome_executable(chrome_path);
    }

    builder.build().map_err(crate::DriverError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_clamps_driver_cap() {
        let config = Config::default();
        assert!(config.driver_cap >= 1);
        assert!(config.driver_cap <= DRIVER_CAP);
        assert_eq!(config.settle_delay, SETTLE_DELAY);
        assert_eq!(config.output_dir, PathBuf::from("img"));
    }

    #[test]
    fn default_viewport_is_desktop_sized() {
        let viewport = Viewport::default();
        assert_eq!(viewport.width, 1920);
        assert_eq!(viewport.height, 1080);
    }

    #[test]
    fn chrome_args_isolate_concurrent_sessions() {
        let config = Config::default();
        let args_a = chrome_args(&config, 0);
        let args_b = chrome_args(&config, 1);

        assert!(args_a.contains(&"--headless".to_string()));
        assert!(args_a.contains(&"--no-sandbox".to_string()));
        assert!(args_a.contains(&"--disable-dev-shm-usage".to_string()));
        assert!(args_a.contains(&"--window-size=1920,1080".to_string()));

        let data_dir = |args: &[String]| {
            args.iter()
                .find(|a| a.starts_with("--user-data-dir="))
                .cloned()
        };
        let port = |args: &[String]| {
            args.iter()
                .find(|a| a.starts_with("--remote-debugging-port="))
                .cloned()
        };
        assert_ne!(data_dir(&args_a), data_dir(&args_b));
        assert_ne!(port(&args_a), port(&args_b));
    }
}
