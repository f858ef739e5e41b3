//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; missing values fall back to the
//! `default_*` functions below.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::crsf::link_stats::TxPowerTable;
use crate::crsf::protocol::CRSF_ADDRESS_FLIGHT_CONTROLLER;
use crate::error::{CrsfRxError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub serial: SerialConfig,
    pub decoder: DecoderConfig,
    pub link: LinkConfig,
    pub monitor: MonitorConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Device path; empty means auto-detect
    #[serde(default)]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Read timeout per poll
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes requested per read
    #[serde(default = "default_read_size")]
    pub read_size: usize,
}

/// Frame decoder configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DecoderConfig {
    /// Device address that starts a frame
    #[serde(default = "default_address")]
    pub address: u8,

    /// Stray bytes absorbed silently between frames
    #[serde(default = "default_garbage_tolerance")]
    pub garbage_tolerance: usize,

    /// Receive buffer room beyond one maximum-size frame
    #[serde(default = "default_buffer_slack")]
    pub buffer_slack: usize,
}

/// Radio link configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    /// Milliwatts for each TX power code, indexed by code
    #[serde(default = "default_tx_power_mw")]
    pub tx_power_mw: Vec<u16>,
}

/// Console monitor configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    #[serde(default = "default_print_interval_ms")]
    pub print_interval_ms: u64,
}

/// Telemetry log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,

    #[serde(default = "default_log_interval_ms")]
    pub log_interval_ms: u64,
}

/// Diagnostic logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily log files; empty logs to stdout only
    #[serde(default)]
    pub directory: String,
}

// Default value functions
fn default_baud_rate() -> u32 { 420000 }
fn default_timeout_ms() -> u64 { crate::receiver::DEFAULT_READ_TIMEOUT.as_millis() as u64 }
fn default_read_size() -> usize { crate::receiver::DEFAULT_READ_SIZE }

fn default_address() -> u8 { CRSF_ADDRESS_FLIGHT_CONTROLLER }
fn default_garbage_tolerance() -> usize { crate::crsf::decoder::DEFAULT_GARBAGE_TOLERANCE }
fn default_buffer_slack() -> usize { crate::crsf::decoder::DEFAULT_BUFFER_SLACK }

fn default_tx_power_mw() -> Vec<u16> { vec![0, 10, 25, 100, 500, 1000, 2000, 250, 50] }

fn default_print_interval_ms() -> u64 { 500 }

fn default_log_dir() -> String { "./logs".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }
fn default_log_interval_ms() -> u64 { 100 }

fn default_log_level() -> String { "info".to_string() }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
            read_size: default_read_size(),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            garbage_tolerance: default_garbage_tolerance(),
            buffer_slack: default_buffer_slack(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            tx_power_mw: default_tx_power_mw(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            print_interval_ms: default_print_interval_ms(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
            log_interval_ms: default_log_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
        }
    }
}

impl LinkConfig {
    /// TX power lookup built from `tx_power_mw`
    pub fn tx_power_table(&self) -> TxPowerTable {
        TxPowerTable::new(self.tx_power_mw.clone())
    }
}

fn invalid(message: impl std::fmt::Display) -> CrsfRxError {
    CrsfRxError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use crsf_rx::config::Config;
    ///
    /// let config = Config::load("config/receiver.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if ![115200, 400000, 416666, 420000, 921600, 1870000, 3750000].contains(&self.serial.baud_rate) {
            return Err(invalid(
                "baud_rate must be one of: 115200, 400000, 416666, 420000, 921600, 1870000, 3750000",
            ));
        }

        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 10000 {
            return Err(invalid("timeout_ms must be between 1 and 10000"));
        }

        if self.serial.read_size == 0 || self.serial.read_size > 4096 {
            return Err(invalid("read_size must be between 1 and 4096"));
        }

        if self.decoder.garbage_tolerance > 64 {
            return Err(invalid("garbage_tolerance must be at most 64"));
        }

        if self.decoder.buffer_slack > 4096 {
            return Err(invalid("buffer_slack must be at most 4096"));
        }

        if self.link.tx_power_mw.is_empty() {
            return Err(invalid("tx_power_mw must list at least one power level"));
        }

        if self.monitor.print_interval_ms == 0 || self.monitor.print_interval_ms > 60000 {
            return Err(invalid("print_interval_ms must be between 1 and 60000"));
        }

        if self.telemetry.enabled && self.telemetry.log_dir.is_empty() {
            return Err(invalid("telemetry log_dir cannot be empty when enabled"));
        }

        if self.telemetry.log_interval_ms == 0 || self.telemetry.log_interval_ms > 60000 {
            return Err(invalid("log_interval_ms must be between 1 and 60000"));
        }

        if self.telemetry.max_records_per_file == 0 {
            return Err(invalid("max_records_per_file must be greater than 0"));
        }

        if self.telemetry.max_files_to_keep == 0 {
            return Err(invalid("max_files_to_keep must be greater than 0"));
        }

        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(invalid(format!(
                "log level '{}' must be one of: trace, debug, info, warn, error",
                self.logging.level
            )));
        }

        Ok(())
    }
}
