//! # CRSF RX Library
//!
//! Decode RC channels and link statistics sent by an ExpressLRS receiver
//! over its CRSF serial link.
//!
//! The decoder ([`crsf::FrameDecoder`]) is a synchronous, in-memory streaming
//! component: feed it bytes, read back channels, telemetry and counters.
//! Serial I/O, telemetry files and console output live in separate modules
//! built around it.

pub mod config;
pub mod error;
pub mod crsf;
pub mod serial;
pub mod receiver;
pub mod telemetry;
pub mod monitor;
