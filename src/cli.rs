use crate::domaingen::{self, GeneratorConfig};
use crate::driver::ChromeDriverFactory;
use crate::orchestrator::Orchestrator;
use crate::server::{self, DEFAULT_PORT};
use crate::stats::RunStats;
use crate::{Config, InputError};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "domainshot")]
#[command(about = "Batch website screenshot tool")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Maximum number of concurrent browser drivers")]
    pub drivers: Option<usize>,

    #[arg(long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, help = "Chrome executable path")]
    pub chrome_path: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture screenshots of domains listed in a file
    Capture {
        #[arg(
            short,
            long,
            default_value = "target.txt",
            help = "Input file containing domains (one per line)"
        )]
        input: PathBuf,

        #[arg(short, long, help = "Output directory for screenshots (default: img)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Progress reporting interval in seconds")]
        progress_interval: Option<u64>,
    },

    /// Generate a candidate domain list from names and extensions
    Generate {
        #[arg(long, env = "SOURCE_FILE", help = "File of base names (one per line)")]
        names: PathBuf,

        #[arg(
            long,
            env = "EXTENSIONS_FILE",
            help = "File of extensions (one per line)"
        )]
        extensions: PathBuf,

        #[arg(
            long,
            env = "TARGET_FILE",
            default_value = "target.txt",
            help = "Output file for the combined list"
        )]
        target: PathBuf,
    },

    /// Serve captured images over HTTP on localhost
    Serve {
        #[arg(short, long, default_value_t = DEFAULT_PORT, help = "Server port")]
        port: u16,
    },
}

#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub progress_interval: Option<u64>,
}

pub struct CliRunner {
    pub config: Config,
}

impl CliRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Capture {
                input,
                output,
                progress_interval,
            } => {
                self.run_capture(CaptureOptions {
                    input,
                    output,
                    progress_interval,
                })
                .await
            }
            Commands::Generate {
                names,
                extensions,
                target,
            } => self.run_generate(names, extensions, target).await,
            Commands::Serve { port } => self.run_serve(port).await,
        }
    }

    pub async fn run_capture(&self, options: CaptureOptions) -> Result<()> {
        info!("Starting batch capture run");

        let domains = read_domain_list(&options.input).await?;
        info!(
            "Loaded {} domains from {}",
            domains.len(),
            options.input.display()
        );

        let mut config = self.config.clone();
        if let Some(output) = options.output {
            config.output_dir = output;
        }

        let factory = Arc::new(ChromeDriverFactory::new(config.clone()));
        let orchestrator = Orchestrator::new(config, factory);

        let reporter = options
            .progress_interval
            .map(|secs| spawn_progress_reporter(orchestrator.stats(), Duration::from_secs(secs)));

        let results = orchestrator.run(domains).await?;

        if let Some(reporter) = reporter {
            reporter.abort();
        }

        let errors = results.iter().filter(|r| !r.success).count();
        info!(
            "Capture run completed. Success: {}, Errors: {}",
            results.len() - errors,
            errors
        );
        Ok(())
    }

    pub async fn run_generate(
        &self,
        names: PathBuf,
        extensions: PathBuf,
        target: PathBuf,
    ) -> Result<()> {
        let generator = GeneratorConfig {
            names_file: names,
            extensions_file: extensions,
            target_file: target,
        };
        domaingen::generate(&generator).await?;
        Ok(())
    }

    pub async fn run_serve(&self, port: u16) -> Result<()> {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        server::serve(addr, self.config.output_dir.clone()).await
    }
}

/// Reads the domain list for a capture run, skipping blank lines and
/// `#` comments.
pub async fn read_domain_list(path: &Path) -> Result<Vec<String>, InputError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| InputError::unreadable(path, e))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn spawn_progress_reporter(
    stats: Arc<RunStats>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately, before any capture has run.
        interval.tick().await;

        loop {
            interval.tick().await;
            let progress = stats.snapshot();

            println!(
                "Progress: {}/{} ({:.1}%) - Success: {}, Errors: {}, Rate: {:.1}/s, ETA: {:?}",
                progress.completed,
                progress.total,
                (progress.completed as f64 / progress.total.max(1) as f64) * 100.0,
                progress.succeeded,
                progress.failed,
                progress.rate,
                progress.eta
            );
        }
    })
}

pub fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    Ok(())
}
