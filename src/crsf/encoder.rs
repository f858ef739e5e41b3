//! # CRSF Frame Builder
//!
//! Builds well-formed receiver-to-host frames. Used to drive the decoder
//! from synthetic byte sources (tests, replay) without a receiver attached.
//! This is not a transmitter: there is no scheduling and no uplink framing.

use super::crc::crc8_frame;
use super::protocol::*;

/// Build a complete frame around an arbitrary payload
///
/// # Arguments
///
/// * `address` - Device address byte
/// * `frame_type` - Frame type byte
/// * `payload` - Payload bytes (at most 60)
///
/// # Panics
///
/// Panics if `payload` exceeds [`CRSF_MAX_PAYLOAD_SIZE`]; callers build
/// fixed-size payloads so this indicates a programming error.
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::encoder::encode_frame;
///
/// let frame = encode_frame(0xC8, 0x28, &[0x00, 0xEA]);
/// assert_eq!(frame.len(), 6);
/// assert_eq!(frame[1], 4); // type + 2 payload bytes + crc
/// ```
pub fn encode_frame(address: u8, frame_type: u8, payload: &[u8]) -> Vec<u8> {
    assert!(
        payload.len() <= CRSF_MAX_PAYLOAD_SIZE,
        "payload size {} exceeds maximum {}",
        payload.len(),
        CRSF_MAX_PAYLOAD_SIZE
    );

    let mut frame = Vec::with_capacity(payload.len() + 4);
    frame.push(address);
    frame.push((payload.len() + 2) as u8);
    frame.push(frame_type);
    frame.extend_from_slice(payload);
    frame.push(crc8_frame(frame_type, payload));
    frame
}

/// Encode RC channels into a complete frame addressed to the flight controller
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::encoder::encode_rc_channels_frame;
///
/// let frame = encode_rc_channels_frame(&[992u16; 16]);
/// assert_eq!(frame.len(), 26);
/// ```
pub fn encode_rc_channels_frame(channels: &RcChannels) -> Vec<u8> {
    encode_frame(
        CRSF_ADDRESS_FLIGHT_CONTROLLER,
        CRSF_FRAMETYPE_RC_CHANNELS_PACKED,
        &encode_rc_channels_payload(channels),
    )
}

/// Pack 16 channels (11 bits each, LSB first) into the 22-byte payload
///
/// Values above 2047 are clamped.
pub fn encode_rc_channels_payload(channels: &RcChannels) -> [u8; CRSF_RC_CHANNELS_PAYLOAD_SIZE] {
    let mut payload = [0u8; CRSF_RC_CHANNELS_PAYLOAD_SIZE];
    let mut bit_index = 0;

    for &channel in channels.iter() {
        let value = channel.min(CRSF_CHANNEL_VALUE_MAX);

        for bit in 0..CRSF_CHANNEL_BITS {
            if (value >> bit) & 1 == 1 {
                payload[bit_index / 8] |= 1 << (bit_index % 8);
            }
            bit_index += 1;
        }
    }

    payload
}

/// Encode link statistics into its wire payload
///
/// Produces 10 bytes when downlink fields are present, 7 otherwise.
pub fn encode_link_statistics_payload(stats: &LinkStatistics) -> Vec<u8> {
    let mut payload = vec![
        stats.rssi1 as u8,
        stats.rssi2 as u8,
        stats.link_quality,
        stats.snr as u8,
        stats.active_antenna,
        stats.rf_mode,
        stats.tx_power,
    ];

    if let Some(downlink) = stats.downlink {
        payload.extend_from_slice(&[downlink.rssi as u8, downlink.link_quality, downlink.snr as u8]);
    }

    payload
}

/// Encode link statistics into a complete frame addressed to the flight controller
pub fn encode_link_statistics_frame(stats: &LinkStatistics) -> Vec<u8> {
    encode_frame(
        CRSF_ADDRESS_FLIGHT_CONTROLLER,
        CRSF_FRAMETYPE_LINK_STATISTICS,
        &encode_link_statistics_payload(stats),
    )
}
