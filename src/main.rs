//! Caffeine: a keep-alive pinger.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration from TOML files, resolves the ping target, starts the
//! keep-alive service, and stops it again once the process is signalled
//! to exit.

use std::path::Path;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caffeine::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use caffeine::shutdown::wait_for_signal;
use caffeine::KeepAlive;

/// Caffeine: a keep-alive pinger for hosted services
#[derive(Parser, Debug)]
#[command(name = "caffeine", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "caffeine=debug")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration. An explicit --config must exist; the default path
    // is optional and built-in defaults apply without it.
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => AppConfig::load(DEFAULT_CONFIG_PATH)?,
        None => AppConfig::default(),
    };

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
    if config.logging.format != "text" && config.logging.format != "json" {
        tracing::warn!(format = %config.logging.format, "Unknown log format, using text");
    }

    tracing::info!("Loaded configuration");

    // Resolve the ping target from config, environment, or the default
    let ping_config = config.ping.resolve();
    tracing::info!(
        target = %ping_config.target_url,
        interval_secs = ping_config.interval.as_secs(),
        startup_delay_secs = ping_config.startup_delay.as_secs(),
        "Ping target resolved"
    );

    let mut service = KeepAlive::new(ping_config)?;
    service.start();

    wait_for_signal().await;

    tracing::info!("Shutting down");
    service.stop().await;

    Ok(())
}
