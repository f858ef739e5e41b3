//! # CRSF Frame Decoder
//!
//! Streaming decoder for receiver-to-host CRSF traffic.
//!
//! [`FrameDecoder::feed`] takes whatever bytes the serial link produced and
//! runs every complete frame through synchronizer → CRC check → channel
//! unpacker or link statistics parser. Malformed data never fails `feed`;
//! it only shows up in [`FrameDecoder::statistics`].

use bytes::{Buf, BytesMut};
use tracing::{debug, warn};

use super::channels::unpack_channels;
use super::convert::{channels_to_microseconds, channels_to_normalized};
use super::crc::crc8_frame;
use super::link_stats::parse_link_statistics;
use super::protocol::*;
use super::stats::{Outcome, Statistics, StatisticsTracker};
use super::sync::{Extract, FrameSynchronizer};
use crate::config::DecoderConfig;
use crate::error::FrameError;

/// Stray bytes tolerated between frames before a framing error is counted
pub const DEFAULT_GARBAGE_TOLERANCE: usize = 3;

/// Extra buffer room beyond one maximum-size frame
pub const DEFAULT_BUFFER_SLACK: usize = 448;

/// Check a candidate frame's CRC
///
/// The CRC covers type + payload only.
///
/// # Returns
///
/// * `Result<u8, FrameError>` - The frame type byte, or a checksum error
pub fn validate_frame(frame: &CrsfFrame) -> Result<u8, FrameError> {
    let calculated = crc8_frame(frame.frame_type, &frame.payload);

    if calculated != frame.crc {
        return Err(FrameError::Checksum {
            calculated,
            received: frame.crc,
        });
    }

    Ok(frame.frame_type)
}

/// Decoder state reported after each `feed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    /// No frame was completed by this call
    #[default]
    Accumulating,
    /// At least one frame was processed (successfully or not)
    FrameReady,
}

/// What a single `feed` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeSummary {
    /// Frames that passed validation (including unhandled types)
    pub frames: usize,
    /// Error outcomes recorded by this call
    pub errors: usize,
    pub state: DecoderState,
}

impl DecodeSummary {
    fn count(&mut self, outcome: Outcome) {
        if outcome.is_error() {
            self.errors += 1;
        } else {
            self.frames += 1;
        }
    }
}

/// Streaming CRSF decoder
///
/// Owns the receive buffer and the latest decoded channels and link
/// statistics. Single-threaded; wrap it in a mutex if it must be shared.
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::decoder::{DecoderState, FrameDecoder};
/// use crsf_rx::crsf::encoder::encode_rc_channels_frame;
///
/// let mut decoder = FrameDecoder::new();
/// let frame = encode_rc_channels_frame(&[992u16; 16]);
///
/// let summary = decoder.feed(&frame[..10]);
/// assert_eq!(summary.state, DecoderState::Accumulating);
///
/// let summary = decoder.feed(&frame[10..]);
/// assert_eq!(summary.frames, 1);
/// assert_eq!(decoder.channels(), [992u16; 16]);
/// assert_eq!(decoder.channels_microseconds()[0], 1500);
/// ```
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: BytesMut,
    capacity: usize,
    sync: FrameSynchronizer,
    garbage_tolerance: usize,
    garbage_run: usize,
    garbage_reported: bool,
    channels: RcChannels,
    link_statistics: LinkStatistics,
    stats: StatisticsTracker,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Decoder for flight-controller-addressed frames with default limits
    pub fn new() -> Self {
        Self::with_settings(
            CRSF_ADDRESS_FLIGHT_CONTROLLER,
            DEFAULT_GARBAGE_TOLERANCE,
            DEFAULT_BUFFER_SLACK,
        )
    }

    /// Decoder with explicit address, garbage tolerance and buffer slack
    ///
    /// The buffer never holds more than `64 + buffer_slack` bytes.
    pub fn with_settings(address: u8, garbage_tolerance: usize, buffer_slack: usize) -> Self {
        let capacity = CRSF_MAX_FRAME_SIZE + buffer_slack;
        Self {
            buffer: BytesMut::with_capacity(capacity),
            capacity,
            sync: FrameSynchronizer::new(address),
            garbage_tolerance,
            garbage_run: 0,
            garbage_reported: false,
            channels: [0; CRSF_NUM_CHANNELS],
            link_statistics: LinkStatistics::default(),
            stats: StatisticsTracker::new(),
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::with_settings(config.address, config.garbage_tolerance, config.buffer_slack)
    }

    /// Append received bytes and decode every complete frame
    ///
    /// Input larger than the free buffer space is taken in pieces, draining
    /// complete frames between pieces, so splitting the same bytes across
    /// several calls gives the same result. Never fails: bad frames and
    /// noise are counted and skipped.
    pub fn feed(&mut self, bytes: &[u8]) -> DecodeSummary {
        let mut summary = DecodeSummary::default();
        let mut rest = bytes;

        loop {
            let free = self.capacity.saturating_sub(self.buffer.len());
            let take = if free == 0 {
                rest.len().min(CRSF_MAX_FRAME_SIZE)
            } else {
                rest.len().min(free)
            };

            let (chunk, tail) = rest.split_at(take);
            self.append(chunk, &mut summary);
            self.drain(&mut summary);

            rest = tail;
            if rest.is_empty() {
                break;
            }
        }

        summary
    }

    /// Latest raw channel values (0-2047)
    pub fn channels(&self) -> RcChannels {
        self.channels
    }

    /// Latest channel values as stick deflection in [-1.0, 1.0]
    pub fn channels_normalized(&self) -> [f32; CRSF_NUM_CHANNELS] {
        channels_to_normalized(&self.channels)
    }

    /// Latest channel values as pulse widths (~1000-2000µs)
    pub fn channels_microseconds(&self) -> [u16; CRSF_NUM_CHANNELS] {
        channels_to_microseconds(&self.channels)
    }

    /// Latest link statistics
    pub fn link_statistics(&self) -> LinkStatistics {
        self.link_statistics
    }

    /// Attempt/error counters since creation or the last reset
    pub fn statistics(&self) -> Statistics {
        self.stats.snapshot()
    }

    /// Start a fresh statistics window; decoded state is kept
    pub fn reset_statistics(&mut self) {
        self.stats.reset();
    }

    /// Bytes waiting for the rest of a frame
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Device address frames are expected from
    pub fn address(&self) -> u8 {
        self.sync.address()
    }

    fn drain(&mut self, summary: &mut DecodeSummary) {
        loop {
            match self.sync.extract(&mut self.buffer) {
                Extract::Incomplete => break,
                Extract::Garbage(count) => self.absorb_garbage(count, summary),
                Extract::Frame(frame) => {
                    self.garbage_run = 0;
                    self.garbage_reported = false;
                    summary.state = DecoderState::FrameReady;

                    let outcome = self.process_frame(&frame);
                    self.record(outcome, summary);
                }
            }
        }
    }

    /// Enforce the buffer bound by dropping the oldest unconsumed bytes
    fn append(&mut self, bytes: &[u8], summary: &mut DecodeSummary) {
        let overflow = (self.buffer.len() + bytes.len()).saturating_sub(self.capacity);

        if overflow == 0 {
            self.buffer.extend_from_slice(bytes);
            return;
        }

        let from_buffer = overflow.min(self.buffer.len());
        self.buffer.advance(from_buffer);
        self.buffer.extend_from_slice(&bytes[overflow - from_buffer..]);

        warn!("Receive buffer full, dropped {} oldest bytes", overflow);
        self.record(Outcome::GarbageDiscarded, summary);
    }

    fn absorb_garbage(&mut self, count: usize, summary: &mut DecodeSummary) {
        self.garbage_run += count;

        if self.garbage_run > self.garbage_tolerance && !self.garbage_reported {
            warn!("Discarded {} bytes while resynchronizing", self.garbage_run);
            self.garbage_reported = true;
            self.record(Outcome::GarbageDiscarded, summary);
        }
    }

    fn process_frame(&mut self, frame: &CrsfFrame) -> Outcome {
        if let Err(e) = validate_frame(frame) {
            debug!("Dropping frame: {}", e);
            return Outcome::ChecksumError;
        }

        match frame.frame_type {
            CRSF_FRAMETYPE_RC_CHANNELS_PACKED => match unpack_channels(&frame.payload) {
                Ok(channels) => {
                    self.channels = channels;
                    Outcome::Success
                }
                Err(e) => {
                    debug!("Dropping RC channels frame: {}", e);
                    Outcome::LengthError
                }
            },
            CRSF_FRAMETYPE_LINK_STATISTICS => match parse_link_statistics(&frame.payload) {
                Ok(stats) => {
                    self.link_statistics = stats;
                    Outcome::Success
                }
                Err(e) => {
                    debug!("Dropping link statistics frame: {}", e);
                    Outcome::LengthError
                }
            },
            other => {
                match FrameType::try_from(other) {
                    Ok(frame_type) => debug!("Ignoring {:?} frame", frame_type),
                    Err(code) => debug!("Ignoring unknown frame type 0x{:02X}", code),
                }
                Outcome::Unsupported
            }
        }
    }

    fn record(&mut self, outcome: Outcome, summary: &mut DecodeSummary) {
        self.stats.record(outcome);
        summary.count(outcome);
    }
}
