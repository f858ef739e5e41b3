//! # CRSF Protocol Module
//!
//! Decoding of the Crossfire (CRSF) frames an ExpressLRS receiver sends to
//! its host.
//!
//! This module handles:
//! - Frame synchronization on the raw byte stream
//! - CRC8-DVB-S2 checksum validation
//! - RC channels unpacking (16 channels, 11-bit resolution)
//! - Link statistics parsing
//! - Success/error accounting

pub mod protocol;
pub mod crc;
pub mod sync;
pub mod channels;
pub mod convert;
pub mod link_stats;
pub mod stats;
pub mod decoder;
pub mod encoder;

pub use decoder::{DecodeSummary, DecoderState, FrameDecoder};
pub use protocol::{LinkStatistics, RcChannels};
pub use stats::Statistics;
