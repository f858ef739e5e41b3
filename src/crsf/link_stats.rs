//! # Link Statistics Parser
//!
//! Decodes the LINK_STATISTICS payload.
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0 | Uplink RSSI ant. 1 | i8, dBm |
//! | 1 | Uplink RSSI ant. 2 | i8, dBm |
//! | 2 | Uplink link quality | u8, % |
//! | 3 | Uplink SNR | i8, dB |
//! | 4 | Active antenna | u8 |
//! | 5 | RF mode | u8 |
//! | 6 | Uplink TX power | u8, code |
//! | 7 | Downlink RSSI (optional) | i8, dBm |
//! | 8 | Downlink link quality (optional) | u8, % |
//! | 9 | Downlink SNR (optional) | i8, dB |
//!
//! Firmware revisions differ in how many trailing fields they send, so only
//! the first seven bytes are required and anything after the tenth is ignored.

use super::protocol::{
    DownlinkStatistics, LinkStatistics, CRSF_FRAMETYPE_LINK_STATISTICS,
    CRSF_LINK_STATS_MIN_PAYLOAD_SIZE, CRSF_LINK_STATS_PAYLOAD_SIZE,
};
use crate::error::FrameError;

/// Decode a link statistics payload
///
/// # Errors
///
/// Returns [`FrameError::Length`] if fewer than 7 bytes are present.
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::link_stats::parse_link_statistics;
///
/// let stats = parse_link_statistics(&[0xC4, 0xC2, 100, 9, 0, 4, 2]).unwrap();
/// assert_eq!(stats.rssi1, -60);
/// assert_eq!(stats.link_quality, 100);
/// assert!(stats.downlink.is_none());
/// ```
pub fn parse_link_statistics(payload: &[u8]) -> Result<LinkStatistics, FrameError> {
    if payload.len() < CRSF_LINK_STATS_MIN_PAYLOAD_SIZE {
        return Err(FrameError::Length {
            frame_type: CRSF_FRAMETYPE_LINK_STATISTICS,
            expected: CRSF_LINK_STATS_MIN_PAYLOAD_SIZE,
            actual: payload.len(),
        });
    }

    let downlink = (payload.len() >= CRSF_LINK_STATS_PAYLOAD_SIZE).then(|| DownlinkStatistics {
        rssi: payload[7] as i8,
        link_quality: payload[8],
        snr: payload[9] as i8,
    });

    Ok(LinkStatistics {
        rssi1: payload[0] as i8,
        rssi2: payload[1] as i8,
        link_quality: payload[2],
        snr: payload[3] as i8,
        active_antenna: payload[4],
        rf_mode: payload[5],
        tx_power: payload[6],
        downlink,
    })
}

/// Maps the opaque `tx_power` code to milliwatts
///
/// The mapping depends on receiver firmware, so the table is supplied by
/// configuration (`link.tx_power_mw`) rather than built in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxPowerTable {
    milliwatts: Vec<u16>,
}

impl TxPowerTable {
    /// Create a table where code `i` maps to `milliwatts[i]`
    pub fn new(milliwatts: Vec<u16>) -> Self {
        Self { milliwatts }
    }

    /// Look up a code; unknown codes give `None`
    pub fn milliwatts(&self, code: u8) -> Option<u16> {
        self.milliwatts.get(code as usize).copied()
    }

    /// Number of known codes
    pub fn len(&self) -> usize {
        self.milliwatts.len()
    }

    /// True if no codes are known
    pub fn is_empty(&self) -> bool {
        self.milliwatts.is_empty()
    }
}

impl LinkStatistics {
    /// TX power in milliwatts according to `table`
    pub fn tx_power_mw(&self, table: &TxPowerTable) -> Option<u16> {
        table.milliwatts(self.tx_power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let payload = [
            0xC4, // rssi1 = -60
            0xC1, // rssi2 = -63
            87,   // link quality
            0xFB, // snr = -5
            1,    // active antenna
            6,    // rf mode
            3,    // tx power code
            0xB5, // downlink rssi = -75
            99,   // downlink lq
            7,    // downlink snr
        ];

        let stats = parse_link_statistics(&payload).unwrap();
        assert_eq!(stats.rssi1, -60);
        assert_eq!(stats.rssi2, -63);
        assert_eq!(stats.link_quality, 87);
        assert_eq!(stats.snr, -5);
        assert_eq!(stats.active_antenna, 1);
        assert_eq!(stats.rf_mode, 6);
        assert_eq!(stats.tx_power, 3);
        assert_eq!(
            stats.downlink,
            Some(DownlinkStatistics {
                rssi: -75,
                link_quality: 99,
                snr: 7
            })
        );
    }

    #[test]
    fn test_parse_minimum_payload() {
        let stats = parse_link_statistics(&[10, 20, 30, 40, 0, 1, 2]).unwrap();
        assert_eq!(stats.rssi1, 10);
        assert_eq!(stats.tx_power, 2);
        assert!(stats.downlink.is_none());
    }

    #[test]
    fn test_parse_partial_downlink_is_ignored() {
        let stats = parse_link_statistics(&[0, 0, 50, 0, 0, 0, 0, 0xB0, 90]).unwrap();
        assert_eq!(stats.link_quality, 50);
        assert!(stats.downlink.is_none());
    }

    #[test]
    fn test_parse_ignores_extra_trailing_bytes() {
        let mut payload = vec![1, 2, 3, 4, 0, 5, 6, 7, 8, 9];
        let expected = parse_link_statistics(&payload).unwrap();

        payload.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        assert_eq!(parse_link_statistics(&payload).unwrap(), expected);
    }

    #[test]
    fn test_parse_too_short() {
        for len in 0..CRSF_LINK_STATS_MIN_PAYLOAD_SIZE {
            let payload = vec![100u8; len];
            assert_eq!(
                parse_link_statistics(&payload),
                Err(FrameError::Length {
                    frame_type: CRSF_FRAMETYPE_LINK_STATISTICS,
                    expected: 7,
                    actual: len,
                })
            );
        }
    }

    #[test]
    fn test_tx_power_lookup() {
        let table = TxPowerTable::new(vec![0, 10, 25, 100, 500, 1000, 2000, 250, 50]);
        let stats = LinkStatistics {
            tx_power: 3,
            ..LinkStatistics::default()
        };

        assert_eq!(stats.tx_power_mw(&table), Some(100));
        assert_eq!(table.milliwatts(8), Some(50));
        assert_eq!(table.milliwatts(9), None);
        assert_eq!(table.len(), 9);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_tx_power_empty_table() {
        let table = TxPowerTable::new(Vec::new());
        assert!(table.is_empty());
        assert_eq!(LinkStatistics::default().tx_power_mw(&table), None);
    }
}
