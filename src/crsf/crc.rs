//! # CRC8-DVB-S2 Implementation
//!
//! CRC-8-DVB-S2 checksum used by every CRSF frame.
//!
//! **Polynomial**: 0xD5 (x^8 + x^7 + x^6 + x^4 + x^2 + 1)
//! **Initial Value**: 0x00
//! **Coverage**: frame type + payload (never address, length or the CRC byte)

/// CRC-8-DVB-S2 polynomial
const CRC8_POLY: u8 = 0xD5;

/// Lookup table, built once at compile time
const CRC8_TABLE: [u8; 256] = generate_crc8_table();

const fn generate_crc8_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u8;
        let mut j = 0;

        while j < 8 {
            crc = if (crc & 0x80) != 0 {
                (crc << 1) ^ CRC8_POLY
            } else {
                crc << 1
            };
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate the CRC8-DVB-S2 checksum of `data`
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::crc::crc8_dvb_s2;
///
/// assert_eq!(crc8_dvb_s2(&[]), 0x00);
/// assert_ne!(crc8_dvb_s2(&[0x16, 0x00]), 0x00);
/// ```
pub fn crc8_dvb_s2(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |crc, &byte| CRC8_TABLE[(crc ^ byte) as usize])
}

/// Checksum of a frame body given as type byte + payload
///
/// Avoids building a temporary buffer when the type and payload are stored
/// separately.
pub fn crc8_frame(frame_type: u8, payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(CRC8_TABLE[frame_type as usize], |crc, &byte| {
            CRC8_TABLE[(crc ^ byte) as usize]
        })
}
