//! # RC Channels Unpacker
//!
//! Decodes the 22-byte RC_CHANNELS_PACKED payload into 16 raw 11-bit values.
//!
//! Channels are a continuous little-endian bitstream, LSB first:
//! ```text
//! Byte 0: Ch1[0:7]
//! Byte 1: Ch1[8:10] | Ch2[0:4]
//! Byte 2: Ch2[5:10] | Ch3[0:1]
//! ...
//! Byte 21: Ch16[3:10]
//! ```

use super::protocol::{
    RcChannels, CRSF_CHANNEL_BITS, CRSF_CHANNEL_VALUE_MAX, CRSF_FRAMETYPE_RC_CHANNELS_PACKED,
    CRSF_NUM_CHANNELS, CRSF_RC_CHANNELS_PAYLOAD_SIZE,
};
use crate::error::FrameError;

/// Unpack 16 channels from an RC channels payload
///
/// Values are returned as-is within 0-2047; nothing is checked against the
/// nominal 172-1811 stick range.
///
/// # Errors
///
/// Returns [`FrameError::Length`] if the payload is not exactly 22 bytes.
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::channels::unpack_channels;
///
/// let channels = unpack_channels(&[0xFF; 22]).unwrap();
/// assert_eq!(channels, [2047u16; 16]);
/// ```
pub fn unpack_channels(payload: &[u8]) -> Result<RcChannels, FrameError> {
    if payload.len() != CRSF_RC_CHANNELS_PAYLOAD_SIZE {
        return Err(FrameError::Length {
            frame_type: CRSF_FRAMETYPE_RC_CHANNELS_PACKED,
            expected: CRSF_RC_CHANNELS_PAYLOAD_SIZE,
            actual: payload.len(),
        });
    }

    let mut channels = [0u16; CRSF_NUM_CHANNELS];
    let mut accumulator: u32 = 0;
    let mut bits: u32 = 0;
    let mut index = 0;

    for &byte in payload {
        accumulator |= (byte as u32) << bits;
        bits += 8;

        while bits >= CRSF_CHANNEL_BITS && index < CRSF_NUM_CHANNELS {
            channels[index] = (accumulator & CRSF_CHANNEL_VALUE_MAX as u32) as u16;
            accumulator >>= CRSF_CHANNEL_BITS;
            bits -= CRSF_CHANNEL_BITS;
            index += 1;
        }
    }

    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crsf::encoder::encode_rc_channels_payload;

    #[test]
    fn test_unpack_all_zeros() {
        assert_eq!(unpack_channels(&[0u8; 22]).unwrap(), [0u16; 16]);
    }

    #[test]
    fn test_unpack_all_ones() {
        assert_eq!(unpack_channels(&[0xFF; 22]).unwrap(), [2047u16; 16]);
    }

    #[test]
    fn test_unpack_first_channel_bits() {
        let mut payload = [0u8; 22];
        payload[0] = 0xFF;
        payload[1] = 0x07;

        let channels = unpack_channels(&payload).unwrap();
        assert_eq!(channels[0], 2047);
        assert!(channels[1..].iter().all(|&ch| ch == 0));
    }

    #[test]
    fn test_unpack_second_channel_straddles_bytes() {
        // Ch2 = 1 sits at bit 11, i.e. bit 3 of byte 1
        let mut payload = [0u8; 22];
        payload[1] = 0x08;

        let channels = unpack_channels(&payload).unwrap();
        assert_eq!(channels[0], 0);
        assert_eq!(channels[1], 1);
    }

    #[test]
    fn test_unpack_last_channel() {
        // Ch16 occupies bits 165-175: top 3 bits of byte 20 and all of byte 21
        let mut payload = [0u8; 22];
        payload[20] = 0xE0;
        payload[21] = 0xFF;

        let channels = unpack_channels(&payload).unwrap();
        assert_eq!(channels[15], 2047);
        assert!(channels[..15].iter().all(|&ch| ch == 0));
    }

    #[test]
    fn test_pack_unpack_boundary_values() {
        let channels: RcChannels = [
            0, 1023, 2047, 172, 992, 1811, 1, 2046, 1024, 512, 0, 2047, 172, 1811, 992, 1500,
        ];

        let payload = encode_rc_channels_payload(&channels);
        assert_eq!(unpack_channels(&payload).unwrap(), channels);
    }

    #[test]
    fn test_pack_unpack_each_channel_isolated() {
        for index in 0..CRSF_NUM_CHANNELS {
            let mut channels = [0u16; CRSF_NUM_CHANNELS];
            channels[index] = 0x5A5 & CRSF_CHANNEL_VALUE_MAX;

            let payload = encode_rc_channels_payload(&channels);
            assert_eq!(unpack_channels(&payload).unwrap(), channels, "channel {}", index);
        }
    }

    #[test]
    fn test_unpack_wrong_length() {
        for len in [0usize, 21, 23, 60] {
            let payload = vec![0u8; len];
            assert_eq!(
                unpack_channels(&payload),
                Err(FrameError::Length {
                    frame_type: CRSF_FRAMETYPE_RC_CHANNELS_PACKED,
                    expected: 22,
                    actual: len,
                })
            );
        }
    }
}
