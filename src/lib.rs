//! # Domainshot
//!
//! A concurrent batch screenshot tool: feed it a list of domains and it
//! partitions the list into contiguous batches across a small fleet of
//! headless Chrome drivers, captures a full-page screenshot of every domain,
//! and scales each image down to a browsable width.
//!
//! ## Features
//!
//! - **Batch Partitioning**: The domain list splits into contiguous batches,
//!   one per driver, sized by ceiling division
//! - **Driver-per-Batch**: Exactly one Chrome instance serves each batch and
//!   is released on every exit path, panics included
//! - **Failure Isolation**: One failing domain never disturbs its batch
//!   siblings; a failed driver launch skips only its own batch
//! - **Full-Page Capture**: PNG screenshots taken after a fixed settle delay
//!   so late-rendering pages come out complete
//! - **Lanczos Resize**: Every screenshot is scaled in place to 500px width
//!   for gallery viewing
//! - **Image Index**: A built-in HTTP server lists captured screenshots as
//!   JSON and serves them statically
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domainshot::{ChromeDriverFactory, Config, Orchestrator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let factory = Arc::new(ChromeDriverFactory::new(config.clone()));
//!     let orchestrator = Orchestrator::new(config, factory);
//!
//!     let results = orchestrator
//!         .run(vec!["example.com".to_string(), "example.org".to_string()])
//!         .await?;
//!     let captured = results.iter().filter(|r| r.success).count();
//!     println!("Captured {} of {} domains", captured, results.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ### Generate a candidate list
//! ```bash
//! domainshot generate --names names.txt --extensions extensions.txt --target target.txt
//! ```
//!
//! ### Capture screenshots
//! ```bash
//! domainshot capture --input target.txt --output img
//! ```
//!
//! ### Browse the results
//! ```bash
//! domainshot serve --port 8000
//! ```

/// Configuration and settings for capture runs
pub mod config;

/// Error types and error handling utilities
pub mod error;

/// Browser driver abstraction and the headless Chrome implementation
pub mod driver;

/// Per-domain capture pipeline: navigate, settle, screenshot, resize
pub mod capture;

/// Batch execution against a single shared driver
pub mod batch;

/// Run orchestration: partitioning and batch fan-out
pub mod orchestrator;

/// Shared run accounting for progress reporting
pub mod stats;

/// Candidate-domain list generation
pub mod domaingen;

/// HTTP image index and static file serving
pub mod server;

/// Command-line interface implementation
pub mod cli;

/// In-place screenshot downscaling
pub mod resize;


pub use batch::*;
pub use capture::*;
pub use cli::*;
pub use config::*;
pub use domaingen::*;
pub use driver::*;
pub use error::*;
pub use orchestrator::*;
pub use resize::*;
pub use server::*;
pub use stats::*;
