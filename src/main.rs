//! # CRSF RX
//!
//! Monitor an ExpressLRS receiver over its CRSF serial link.
//!
//! Opens the receiver UART, decodes RC channels and link statistics, and
//! prints a snapshot at a fixed interval until Ctrl+C.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tokio::time::{Duration, Instant};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crsf_rx::config::{Config, LoggingConfig};
use crsf_rx::monitor::{format_snapshot, format_statistics};
use crsf_rx::receiver::CrsfReceiver;
use crsf_rx::serial::SerialSource;
use crsf_rx::telemetry::{TelemetryLogger, TelemetryRecord};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "crsf-rx", version, about = "Monitor CRSF frames from an ExpressLRS receiver")]
struct Cli {
    /// Configuration file (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial device, overrides the configured port
    #[arg(long)]
    port: Option<String>,

    /// Stop after this many seconds
    #[arg(long)]
    duration: Option<u64>,
}

/// Set up console logging, plus a daily log file when a directory is configured
///
/// The returned guard must stay alive for file output to be flushed.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = if config.directory.is_empty() {
        (None, None)
    } else {
        let appender = tracing_appender::rolling::daily(&config.directory, "crsf-rx.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// Main entry point
///
/// # Control Flow
///
/// 1. Load configuration and initialize logging
/// 2. Open the receiver serial port
/// 3. Poll the port, printing a snapshot every `monitor.print_interval_ms`
///    and writing telemetry every `telemetry.log_interval_ms` when enabled
/// 4. Stop on Ctrl+C, after `--duration`, or when the port fails
///
/// # Examples
///
/// ```bash
/// crsf-rx --port /dev/serial0
/// crsf-rx --config receiver.toml --duration 30
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(port) = cli.port {
        config.serial.port = port;
    }

    let _log_guard = init_logging(&config.logging);
    info!("CRSF RX v{} starting...", env!("CARGO_PKG_VERSION"));

    let source = SerialSource::open(&config.serial).context("Failed to open receiver serial port")?;
    let tx_power = config.link.tx_power_table();
    let mut receiver = CrsfReceiver::from_config(source, &config);

    let mut telemetry = if config.telemetry.enabled {
        Some(TelemetryLogger::new(&config.telemetry).context("Failed to set up telemetry log")?)
    } else {
        None
    };

    let print_interval = Duration::from_millis(config.monitor.print_interval_ms);
    let log_interval = Duration::from_millis(config.telemetry.log_interval_ms);
    let deadline = cli.duration.map(|secs| Instant::now() + Duration::from_secs(secs));

    info!("Monitoring CRSF frames, press Ctrl+C to stop");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last_print = Instant::now();
    let mut last_log = Instant::now();

    loop {
        tokio::select! {
            result = receiver.poll() => {
                result.context("Receiver stopped")?;
            }

            _ = &mut shutdown => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }

        let now = Instant::now();

        if now.duration_since(last_print) >= print_interval {
            println!("{}", format_snapshot(receiver.decoder(), &tx_power));
            last_print = now;
        }

        if let Some(logger) = telemetry.as_mut() {
            if now.duration_since(last_log) >= log_interval {
                logger.log(&TelemetryRecord::capture(receiver.decoder(), &tx_power, Utc::now()))?;
                last_log = now;
            }
        }

        if deadline.is_some_and(|deadline| now >= deadline) {
            info!("Monitoring duration elapsed");
            break;
        }
    }

    receiver.close();
    if let Some(logger) = telemetry.as_mut() {
        logger.flush()?;
    }

    info!("{}", format_statistics(&receiver.decoder().statistics()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["crsf-rx"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.port.is_none());
        assert!(cli.duration.is_none());
    }

    #[test]
    fn test_cli_all_options() {
        let cli = Cli::try_parse_from([
            "crsf-rx",
            "--config",
            "receiver.toml",
            "--port",
            "/dev/ttyAMA0",
            "--duration",
            "30",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("receiver.toml")));
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyAMA0"));
        assert_eq!(cli.duration, Some(30));
    }

    #[test]
    fn test_cli_rejects_bad_duration() {
        assert!(Cli::try_parse_from(["crsf-rx", "--duration", "soon"]).is_err());
    }
}
