//! Browser driver sessions and their lifecycle.
//!
//! A [`Driver`] is one live headless-browser session. Each batch owns exactly
//! one driver behind a [`DriverGuard`], which releases the session exactly
//! once no matter how the batch exits.

use crate::{browser_config, profile_dir, CaptureError, Config, DriverError};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use metrics::counter;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// One live headless-browser session: navigation plus screenshot persistence.
///
/// Methods take `&mut self` so a session can only be driven through mutual
/// exclusion; the capture pipeline holds the session lock across its whole
/// navigate-to-screenshot stretch.
#[async_trait]
pub trait Driver: Send {
    /// Navigates the session to `url` and waits for the load to complete.
    async fn navigate(&mut self, url: &str) -> Result<(), CaptureError>;

    /// Persists a full-page PNG screenshot of the current page to `path`.
    async fn save_screenshot(&mut self, path: &Path) -> Result<(), CaptureError>;

    /// Terminates the session. Invoked exactly once, via [`DriverGuard`].
    async fn close(&mut self);
}

/// Launches driver sessions. A batch acquires exactly one per run.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Driver>, DriverError>;
}

/// Chrome session driven over the DevTools protocol.
pub struct ChromeDriver {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: tokio::task::JoinHandle<()>,
    instance_id: usize,
}

#[async_trait]
impl Driver for ChromeDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), CaptureError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| CaptureError::NavigationFailed("session already closed".to_string()))?;

        match &self.page {
            Some(page) => {
                page.goto(url)
                    .await
                    .map_err(|e| CaptureError::NavigationFailed(e.to_string()))?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| CaptureError::NavigationFailed(e.to_string()))?;
            }
            None => {
                let page = browser
                    .new_page(url)
                    .await
                    .map_err(|e| CaptureError::NavigationFailed(e.to_string()))?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| CaptureError::NavigationFailed(e.to_string()))?;
                self.page = Some(page);
            }
        }
        Ok(())
    }

    async fn save_screenshot(&mut self, path: &Path) -> Result<(), CaptureError> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| CaptureError::CaptureFailed("no page rendered yet".to_string()))?;

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();

        page.save_screenshot(params, path)
            .await
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(page) = self.page.take() {
            let _ = page.close().await;
        }
        if let Some(mut browser) = self.browser.take() {
            let _ = browser.close().await;
            self.handler.abort();
            info!("Chrome session {} shut down", self.instance_id);
        }
    }
}

/// Launches isolated Chrome sessions, one per batch.
pub struct ChromeDriverFactory {
    config: Config,
    next_instance: AtomicUsize,
}

impl ChromeDriverFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            next_instance: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DriverFactory for ChromeDriverFactory {
    async fn launch(&self) -> Result<Box<dyn Driver>, DriverError> {
        let id = self.next_instance.fetch_add(1, Ordering::Relaxed);

        let profile = profile_dir(id);
        std::fs::create_dir_all(&profile)
            .map_err(|e| DriverError(format!("Failed to create profile dir {profile}: {e}")))?;

        let launch_config = browser_config(&self.config, id)?;
        let (browser, mut handler) = Browser::launch(launch_config)
            .await
            .map_err(|e| DriverError(e.to_string()))?;

        // The handler implements Stream and must be polled for the session
        // to make progress.
        let handler_task = tokio::spawn(async move {
            loop {
                match handler.next().await {
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        error!("Chrome event stream error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        });

        counter!("drivers_launched_total", 1);
        info!("Chrome session {} launched (profile {})", id, profile);

        Ok(Box::new(ChromeDriver {
            browser: Some(browser),
            page: None,
            handler: handler_task,
            instance_id: id,
        }))
    }
}

/// Scoped ownership of one driver session.
///
/// [`release`](DriverGuard::release) shuts the session down exactly once,
/// after the batch has joined all of its capture tasks. If a guard dies
/// without an explicit release (the batch future was dropped mid-flight),
/// `Drop` spawns the shutdown in the background instead, so the session is
/// never leaked by batch logic.
pub struct DriverGuard {
    session: Arc<Mutex<Box<dyn Driver>>>,
    released: bool,
}

impl DriverGuard {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            session: Arc::new(Mutex::new(driver)),
            released: false,
        }
    }

    /// Shared handle capture tasks lock to drive the session.
    pub fn session(&self) -> Arc<Mutex<Box<dyn Driver>>> {
        self.session.clone()
    }

    /// Shuts the session down. Consumes the guard, so a second release does
    /// not typecheck.
    pub async fn release(mut self) {
        self.released = true;
        self.session.lock().await.close().await;
        counter!("drivers_released_total", 1);
    }
}

impl Drop for DriverGuard {
    fn drop(&mut self) {
        if !self.released {
            let session = self.session.clone();
            tokio::spawn(async move {
                session.lock().await.close().await;
                counter!("drivers_released_total", 1);
            });
        }
    }
}
