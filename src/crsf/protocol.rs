//! # CRSF Protocol Constants and Types
//!
//! Wire-level definitions for frames sent by a CRSF receiver to the host.
//!
//! ```text
//! [Address:1][Length:1][Type:1][Payload: Length-2][CRC8:1]
//! ```
//!
//! `Length` counts Type + Payload + CRC, so a whole frame is `Length + 2` bytes.

use serde::Serialize;

/// Device address of frames addressed to the flight controller
pub const CRSF_ADDRESS_FLIGHT_CONTROLLER: u8 = 0xC8;

/// RC Channels packet type
pub const CRSF_FRAMETYPE_RC_CHANNELS_PACKED: u8 = 0x16;

/// Link Statistics packet type
pub const CRSF_FRAMETYPE_LINK_STATISTICS: u8 = 0x14;

/// Maximum size of a whole frame (address through CRC)
pub const CRSF_MAX_FRAME_SIZE: usize = 64;

/// Smallest legal length field (type + crc, empty payload)
pub const CRSF_MIN_LENGTH_FIELD: u8 = 2;

/// Largest legal length field
pub const CRSF_MAX_LENGTH_FIELD: u8 = (CRSF_MAX_FRAME_SIZE - 2) as u8;

/// Maximum CRSF payload size (64 - address - length - type - crc)
pub const CRSF_MAX_PAYLOAD_SIZE: usize = CRSF_MAX_FRAME_SIZE - 4;

/// RC channels payload size (22 bytes for 16 channels × 11 bits)
pub const CRSF_RC_CHANNELS_PAYLOAD_SIZE: usize = 22;

/// RC channels frame length field (type + payload + crc)
pub const CRSF_RC_CHANNELS_FRAME_LENGTH: u8 = 0x18;

/// Number of RC channels
pub const CRSF_NUM_CHANNELS: usize = 16;

/// Bits per packed channel
pub const CRSF_CHANNEL_BITS: u32 = 11;

/// Channel value range (11-bit: 0-2047)
pub const CRSF_CHANNEL_VALUE_MIN: u16 = 0;
pub const CRSF_CHANNEL_VALUE_MAX: u16 = 2047;

/// Nominal stick range used by receiver firmware (1000µs / 1500µs / 2000µs)
pub const CRSF_CHANNEL_VALUE_NOMINAL_MIN: u16 = 172;
pub const CRSF_CHANNEL_VALUE_CENTER: u16 = 992;
pub const CRSF_CHANNEL_VALUE_NOMINAL_MAX: u16 = 1811;

/// Link statistics payload size as documented (uplink + downlink fields)
pub const CRSF_LINK_STATS_PAYLOAD_SIZE: usize = 10;

/// Bytes that must be present for the uplink part of link statistics
pub const CRSF_LINK_STATS_MIN_PAYLOAD_SIZE: usize = 7;

/// RC channels array type (16 channels, 11-bit values)
pub type RcChannels = [u16; CRSF_NUM_CHANNELS];

/// CRSF frame types
///
/// Only [`FrameType::RcChannelsPacked`] and [`FrameType::LinkStatistics`]
/// are decoded; the rest are named so unhandled traffic shows up readably
/// in logs.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Gps = 0x02,
    Vario = 0x07,
    BatterySensor = 0x08,
    BaroAltitude = 0x09,
    LinkStatistics = 0x14,
    RcChannelsPacked = 0x16,
    Attitude = 0x1E,
    FlightMode = 0x21,
    DevicePing = 0x28,
    DeviceInfo = 0x29,
    ParameterSettingsEntry = 0x2B,
    ParameterRead = 0x2C,
    ParameterWrite = 0x2D,
    Command = 0x32,
}

impl TryFrom<u8> for FrameType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            0x02 => Self::Gps,
            0x07 => Self::Vario,
            0x08 => Self::BatterySensor,
            0x09 => Self::BaroAltitude,
            0x14 => Self::LinkStatistics,
            0x16 => Self::RcChannelsPacked,
            0x1E => Self::Attitude,
            0x21 => Self::FlightMode,
            0x28 => Self::DevicePing,
            0x29 => Self::DeviceInfo,
            0x2B => Self::ParameterSettingsEntry,
            0x2C => Self::ParameterRead,
            0x2D => Self::ParameterWrite,
            0x32 => Self::Command,
            other => return Err(other),
        })
    }
}

/// Known CRSF device addresses
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAddress {
    Broadcast = 0x00,
    TbsCorePnpPro = 0x80,
    Reserved1 = 0x8A,
    CurrentSensor = 0xC0,
    Gps = 0xC2,
    TbsBlackbox = 0xC4,
    FlightController = 0xC8,
    Reserved2 = 0xCA,
    RaceTag = 0xCC,
    RadioTransmitter = 0xEA,
    CrsfReceiver = 0xEC,
    CrsfTransmitter = 0xEE,
}

impl TryFrom<u8> for DeviceAddress {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Self::Broadcast,
            0x80 => Self::TbsCorePnpPro,
            0x8A => Self::Reserved1,
            0xC0 => Self::CurrentSensor,
            0xC2 => Self::Gps,
            0xC4 => Self::TbsBlackbox,
            0xC8 => Self::FlightController,
            0xCA => Self::Reserved2,
            0xCC => Self::RaceTag,
            0xEA => Self::RadioTransmitter,
            0xEC => Self::CrsfReceiver,
            0xEE => Self::CrsfTransmitter,
            other => return Err(other),
        })
    }
}

/// Link statistics telemetry data
///
/// Fixed-shape record. Only the first seven payload bytes are required;
/// downlink fields are present on firmware that sends the full 10 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LinkStatistics {
    /// Uplink RSSI, antenna 1 (dBm)
    pub rssi1: i8,

    /// Uplink RSSI, antenna 2 (dBm)
    pub rssi2: i8,

    /// Uplink link quality (0-100%)
    pub link_quality: u8,

    /// Uplink SNR (dB)
    pub snr: i8,

    /// Active diversity antenna index
    pub active_antenna: u8,

    /// RF mode / packet rate code
    pub rf_mode: u8,

    /// Uplink TX power code, see [`crate::crsf::link_stats::TxPowerTable`]
    pub tx_power: u8,

    /// Downlink fields, when the payload carries them
    pub downlink: Option<DownlinkStatistics>,
}

/// Optional downlink part of link statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownlinkStatistics {
    /// Downlink RSSI (dBm)
    pub rssi: i8,

    /// Downlink link quality (0-100%)
    pub link_quality: u8,

    /// Downlink SNR (dB)
    pub snr: i8,
}

/// A candidate frame sliced out of the byte stream
///
/// Only lives for a single decode attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrsfFrame {
    /// Device address byte
    pub address: u8,

    /// Length field (type + payload + crc)
    pub length: u8,

    /// Frame type byte
    pub frame_type: u8,

    /// Payload (`length - 2` bytes)
    pub payload: Vec<u8>,

    /// Received CRC trailer
    pub crc: u8,
}

impl CrsfFrame {
    /// Split a whole frame (address through CRC) into its fields
    ///
    /// Returns `None` unless `bytes` is exactly `length + 2` long with a
    /// length field of at least 2.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&address, rest) = bytes.split_first()?;
        let (&length, rest) = rest.split_first()?;
        if length < CRSF_MIN_LENGTH_FIELD || rest.len() != length as usize {
            return None;
        }

        let (&frame_type, rest) = rest.split_first()?;
        let (&crc, payload) = rest.split_last()?;

        Some(Self {
            address,
            length,
            frame_type,
            payload: payload.to_vec(),
            crc,
        })
    }

    /// Total size on the wire
    pub fn wire_size(&self) -> usize {
        self.length as usize + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_constants() {
        assert_eq!(CRSF_ADDRESS_FLIGHT_CONTROLLER, 0xC8);
        assert_eq!(CRSF_FRAMETYPE_RC_CHANNELS_PACKED, 0x16);
        assert_eq!(CRSF_FRAMETYPE_LINK_STATISTICS, 0x14);
        assert_eq!(CRSF_MAX_LENGTH_FIELD, 62);
        assert_eq!(CRSF_MAX_PAYLOAD_SIZE, 60);
        assert_eq!(
            CRSF_RC_CHANNELS_FRAME_LENGTH as usize,
            CRSF_RC_CHANNELS_PAYLOAD_SIZE + 2
        );
    }

    #[test]
    fn test_channel_bits_fill_payload_exactly() {
        let bits = CRSF_NUM_CHANNELS as u32 * CRSF_CHANNEL_BITS;
        assert_eq!(bits as usize, CRSF_RC_CHANNELS_PAYLOAD_SIZE * 8);
        assert_eq!(CRSF_CHANNEL_VALUE_MAX, (1 << CRSF_CHANNEL_BITS) - 1);
    }

    #[test]
    fn test_frame_type_from_byte() {
        assert_eq!(FrameType::try_from(0x16), Ok(FrameType::RcChannelsPacked));
        assert_eq!(FrameType::try_from(0x14), Ok(FrameType::LinkStatistics));
        assert_eq!(FrameType::try_from(0x29), Ok(FrameType::DeviceInfo));
        assert_eq!(FrameType::try_from(0x7F), Err(0x7F));
    }

    #[test]
    fn test_frame_type_discriminants_round_trip() {
        for byte in 0..=255u8 {
            if let Ok(frame_type) = FrameType::try_from(byte) {
                assert_eq!(frame_type as u8, byte);
            }
        }
    }

    #[test]
    fn test_device_address_from_byte() {
        assert_eq!(DeviceAddress::try_from(0xC8), Ok(DeviceAddress::FlightController));
        assert_eq!(DeviceAddress::try_from(0xEE), Ok(DeviceAddress::CrsfTransmitter));
        assert_eq!(DeviceAddress::try_from(0x55), Err(0x55));
    }

    #[test]
    fn test_crsf_frame_from_bytes() {
        let bytes = [0xC8, 0x04, 0x3A, 0x01, 0x02, 0x99];
        let frame = CrsfFrame::from_bytes(&bytes).unwrap();

        assert_eq!(frame.address, 0xC8);
        assert_eq!(frame.length, 4);
        assert_eq!(frame.frame_type, 0x3A);
        assert_eq!(frame.payload, vec![0x01, 0x02]);
        assert_eq!(frame.crc, 0x99);
        assert_eq!(frame.wire_size(), 6);
    }

    #[test]
    fn test_crsf_frame_empty_payload() {
        let frame = CrsfFrame::from_bytes(&[0xC8, 0x02, 0x28, 0x11]).unwrap();
        assert!(frame.payload.is_empty());
        assert_eq!(frame.crc, 0x11);
    }

    #[test]
    fn test_crsf_frame_rejects_malformed_slices() {
        assert_eq!(CrsfFrame::from_bytes(&[]), None);
        assert_eq!(CrsfFrame::from_bytes(&[0xC8]), None);
        assert_eq!(CrsfFrame::from_bytes(&[0xC8, 0x02]), None);
        assert_eq!(CrsfFrame::from_bytes(&[0xC8, 0x01, 0x28]), None);
        // Length field disagrees with the slice
        assert_eq!(CrsfFrame::from_bytes(&[0xC8, 0x04, 0x28, 0x11]), None);
        assert_eq!(CrsfFrame::from_bytes(&[0xC8, 0x02, 0x28, 0x11, 0x00]), None);
    }
}
