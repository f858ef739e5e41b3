//! # Error Types
//!
//! Error types for CRSF RX using `thiserror`.
//!
//! Two layers are kept apart:
//! - [`CrsfRxError`] is what callers see: serial/source failures, misuse of
//!   the source lifecycle, configuration and telemetry file problems.
//! - [`FrameError`] describes a single malformed frame. The decoder turns it
//!   into a statistics outcome and never hands it back from `feed`.

use thiserror::Error;

/// Main error type for CRSF RX
#[derive(Debug, Error)]
pub enum CrsfRxError {
    /// Serial port errors
    #[error("Serial port error: {0}")]
    Serial(String),

    /// No usable serial device at any of the tried paths
    #[error("No serial device found (tried: {0})")]
    SerialPortNotFound(String),

    /// Byte source used before `open()` or after `close()`
    #[error("Byte source is not open")]
    NotOpen,

    /// Byte source reached end of stream (device unplugged)
    #[error("Device disconnected: {0}")]
    Disconnected(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Telemetry record serialization errors
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] serde_json::Error),
}

/// Result type alias for CRSF RX
pub type Result<T> = std::result::Result<T, CrsfRxError>;

/// Reason a single candidate frame was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// CRC trailer does not match type + payload
    #[error("CRC mismatch: calculated 0x{calculated:02X}, received 0x{received:02X}")]
    Checksum { calculated: u8, received: u8 },

    /// Payload length not acceptable for the frame type
    #[error("Invalid payload length for frame type 0x{frame_type:02X}: expected {expected}, got {actual}")]
    Length {
        frame_type: u8,
        expected: usize,
        actual: usize,
    },
}
