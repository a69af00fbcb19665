use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod alarm;
mod config;
mod engine;
mod models;
mod notifier;
mod prober;

use crate::config::MonitorConfig;
use crate::engine::Monitor;

/// INFO unless `directives` says otherwise.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .parse_lossy(directives)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Before the subscriber, so RUST_LOG from .env is honored. A missing
    // .env file is fine; the real environment still applies.
    dotenvy::dotenv().ok();

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .with_ansi(true)
        .init();

    let config = MonitorConfig::from_env()
        .context("Invalid monitor configuration")?;
    let monitor = Monitor::new(config)?;

    tokio::select! {
        _ = monitor.run() => {}
        res = signal::ctrl_c() => {
            res?;
            info!("Shutdown signal received. Stopping uptime monitor...");
        }
    }

    Ok(())
}
