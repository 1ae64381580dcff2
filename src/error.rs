use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Per-domain capture failure. Caught at the capture boundary and folded into
/// that domain's [`CaptureResult`](crate::CaptureResult); never aborts sibling
/// captures or the owning batch.
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Screenshot capture failed: {0}")]
    CaptureFailed(String),

    #[error("Resize failed: {0}")]
    ResizeFailed(String),
}

impl CaptureError {
    /// Pipeline stage the failure belongs to, for logs and counters.
    pub fn stage(&self) -> &'static str {
        match self {
            CaptureError::NavigationFailed(_) => "navigation",
            CaptureError::CaptureFailed(_) => "capture",
            CaptureError::ResizeFailed(_) => "resize",
        }
    }
}

/// Failure to establish a browser session. Fails the owning batch only:
/// the batch is skipped and sibling batches keep running.
#[derive(Debug, Clone, Error)]
#[error("Driver acquisition failed: {0}")]
pub struct DriverError(pub String);

/// Fatal input problems: an unreadable or empty list file, or an unusable
/// output location. These are the only errors that abort a run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write {}: {source}", .path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No usable entries in {}", .path.display())]
    EmptyList { path: PathBuf },
}

impl InputError {
    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        InputError::Unreadable {
            path: path.into(),
            source,
        }
    }

    pub fn unwritable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        InputError::Unwritable {
            path: path.into(),
            source,
        }
    }

    pub fn empty_list(path: impl Into<PathBuf>) -> Self {
        InputError::EmptyList { path: path.into() }
    }
}
