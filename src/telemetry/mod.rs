//! # Telemetry Module
//!
//! Snapshot logging of decoded receiver state to JSONL files with rotation.
//!
//! This module handles:
//! - Building timestamped snapshots of channels, link statistics and counters
//! - Formatting them as JSONL (JSON Lines)
//! - Rotating files after N records and keeping only the newest M files

pub mod logger;
pub mod types;

pub use logger::TelemetryLogger;
pub use types::TelemetryRecord;
