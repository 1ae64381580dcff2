use clap::Parser;
use domainshot::{setup_logging, Cli, CliRunner, Config};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    info!("Starting domainshot v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&args).await?;

    let cli_runner = CliRunner::new(config);

    // Setup graceful shutdown
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::broadcast::channel(1);
    let _shutdown_handler = setup_shutdown_handler(shutdown_tx.clone());

    // Start the application based on command
    let result = tokio::select! {
        result = cli_runner.run(args.command) => {
            info!("Application completed");
            result
        }
        _ = shutdown_rx.recv() => {
            info!("Received shutdown signal");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Application error: {}", e);
        std::process::exit(1);
    }

    info!("Domainshot stopped");
    Ok(())
}

async fn load_config(args: &Cli) -> anyhow::Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        // Load from file
        let config_content = tokio::fs::read_to_string(config_path).await?;
        serde_json::from_str(&config_content)?
    } else {
        // Use default configuration
        Config::default()
    };

    // Override with CLI arguments
    if let Some(drivers) = args.drivers {
        config.driver_cap = drivers;
    }

    if let Some(chrome_path) = &args.chrome_path {
        config.chrome_path = Some(chrome_path.clone());
    }

    // Validate configuration
    validate_config(&config)?;

    info!("Configuration loaded successfully");
    info!("Driver cap: {}", config.driver_cap);
    info!("Settle delay: {:?}", config.settle_delay);
    info!("Capture timeout: {:?}", config.capture_timeout);

    Ok(config)
}

fn validate_config(config: &Config) -> anyhow::Result<()> {
    anyhow::ensure!(config.driver_cap > 0, "Driver cap must be greater than 0");
    anyhow::ensure!(
        config.capture_timeout.as_secs() > 0,
        "Capture timeout must be greater than 0"
    );
    anyhow::ensure!(
        config.viewport.width > 0 && config.viewport.height > 0,
        "Viewport dimensions must be greater than 0"
    );
    Ok(())
}

fn setup_shutdown_handler(
    shutdown_tx: tokio::sync::broadcast::Sender<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
            .expect("Failed to create SIGINT handler");
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to create SIGTERM handler");

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
        }

        let _ = shutdown_tx.send(());
    })
}
