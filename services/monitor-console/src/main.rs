//! Monitor console CLI
//!
//! Command-line entry point for the recruit monitor administration console.

use std::path::PathBuf;

use clap::Parser;
use monitor_console::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "monitor-console")]
#[command(about = "Administration console for the recruit monitor server")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the monitor server (overrides config file)
    #[arg(short, long)]
    server: Option<String>,

    /// Status poll interval in milliseconds (overrides config file)
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Give up after this many password prompts (overrides config file)
    #[arg(long)]
    max_login_attempts: Option<u32>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, server={:?}, log_level={:?}",
        args.config,
        args.server,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(server) = args.server {
        config.server.base_url = server;
    }
    if let Some(interval_ms) = args.poll_interval_ms.filter(|ms| *ms > 0) {
        config.poller.interval_ms = interval_ms;
    }
    if args.max_login_attempts.is_some() {
        config.login.max_attempts = args.max_login_attempts;
    }

    tracing::info!("Starting monitor console");
    monitor_console::run(config).await?;

    Ok(())
}
