//! # CRSF Receiver
//!
//! Couples a [`ByteSource`] with a [`FrameDecoder`]. Each [`CrsfReceiver::poll`]
//! performs one bounded read and feeds whatever arrived to the decoder.
//!
//! Source failures (device gone, read after close) are returned to the
//! caller. Frame problems never are; they only move the decoder counters.

use std::time::Duration;

use crate::config::Config;
use crate::crsf::decoder::{DecodeSummary, FrameDecoder};
use crate::error::Result;
use crate::serial::ByteSource;

/// Default bytes requested per read
pub const DEFAULT_READ_SIZE: usize = 256;

/// Default per-read timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(10);

/// Byte source plus decoder
#[derive(Debug)]
pub struct CrsfReceiver<S> {
    source: S,
    decoder: FrameDecoder,
    read_size: usize,
    timeout: Duration,
}

impl<S: ByteSource> CrsfReceiver<S> {
    pub fn new(source: S, decoder: FrameDecoder) -> Self {
        Self {
            source,
            decoder,
            read_size: DEFAULT_READ_SIZE,
            timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Receiver using the decoder and read settings from `config`
    pub fn from_config(source: S, config: &Config) -> Self {
        Self {
            source,
            decoder: FrameDecoder::from_config(&config.decoder),
            read_size: config.serial.read_size,
            timeout: Duration::from_millis(config.serial.timeout_ms),
        }
    }

    /// Read once and decode
    ///
    /// A read timeout is not an error: it yields an empty summary.
    ///
    /// # Errors
    ///
    /// Propagates byte source failures unchanged.
    pub async fn poll(&mut self) -> Result<DecodeSummary> {
        let bytes = self.source.read(self.read_size, self.timeout).await?;

        if bytes.is_empty() {
            return Ok(DecodeSummary::default());
        }

        Ok(self.decoder.feed(&bytes))
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut FrameDecoder {
        &mut self.decoder
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Close the source; decoded state stays readable
    pub fn close(&mut self) {
        self.source.close();
    }
}
