//! # Frame Synchronizer
//!
//! Finds frame boundaries in the raw receiver byte stream.
//!
//! A frame starts at the configured device address. The byte after it is
//! the length field; anything outside 2..=62 means the "address" was really
//! line noise, so only that one byte is dropped and the scan restarts.

use bytes::{Buf, BytesMut};

use super::protocol::{CrsfFrame, CRSF_MAX_LENGTH_FIELD, CRSF_MIN_LENGTH_FIELD};

/// Result of one synchronizer pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extract {
    /// A complete candidate frame was consumed from the buffer
    Frame(CrsfFrame),
    /// Not enough bytes for a frame yet; the buffer was left untouched
    Incomplete,
    /// This many leading bytes were dropped while looking for a frame start
    Garbage(usize),
}

/// Locates and slices frames addressed to one device
#[derive(Debug, Clone, Copy)]
pub struct FrameSynchronizer {
    address: u8,
}

impl FrameSynchronizer {
    pub fn new(address: u8) -> Self {
        Self { address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Run one pass over `buffer`
    ///
    /// Call repeatedly until [`Extract::Incomplete`] is returned. A pass
    /// either consumes bytes (a frame or garbage) or leaves the buffer as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use crsf_rx::crsf::sync::{Extract, FrameSynchronizer};
    ///
    /// let sync = FrameSynchronizer::new(0xC8);
    /// let mut buffer = BytesMut::from(&[0x00, 0xC8, 0x02, 0x28][..]);
    ///
    /// assert_eq!(sync.extract(&mut buffer), Extract::Garbage(1));
    /// assert_eq!(sync.extract(&mut buffer), Extract::Incomplete);
    /// ```
    pub fn extract(&self, buffer: &mut BytesMut) -> Extract {
        let start = match buffer.iter().position(|&byte| byte == self.address) {
            Some(start) => start,
            None if buffer.is_empty() => return Extract::Incomplete,
            None => {
                let dropped = buffer.len();
                buffer.clear();
                return Extract::Garbage(dropped);
            }
        };

        if start > 0 {
            buffer.advance(start);
            return Extract::Garbage(start);
        }

        let Some(&length) = buffer.get(1) else {
            return Extract::Incomplete;
        };

        if !(CRSF_MIN_LENGTH_FIELD..=CRSF_MAX_LENGTH_FIELD).contains(&length) {
            buffer.advance(1);
            return Extract::Garbage(1);
        }

        let frame_size = length as usize + 2;
        if buffer.len() < frame_size {
            return Extract::Incomplete;
        }

        let bytes = buffer.split_to(frame_size);
        match CrsfFrame::from_bytes(&bytes) {
            Some(frame) => Extract::Frame(frame),
            None => Extract::Garbage(frame_size),
        }
    }
}
