//! Telemetry record written once per log interval.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::crsf::decoder::FrameDecoder;
use crate::crsf::link_stats::TxPowerTable;
use crate::crsf::protocol::{LinkStatistics, RcChannels};
use crate::crsf::stats::Statistics;

/// One JSONL line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    /// RFC 3339 UTC timestamp with milliseconds
    pub timestamp: String,
    pub channels: RcChannels,
    pub channels_us: RcChannels,
    pub link: LinkStatistics,
    /// TX power resolved through the configured table
    pub tx_power_mw: Option<u16>,
    pub stats: Statistics,
}

impl TelemetryRecord {
    /// Snapshot the decoder at `now`
    pub fn capture(decoder: &FrameDecoder, tx_power: &TxPowerTable, now: DateTime<Utc>) -> Self {
        let link = decoder.link_statistics();

        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            channels: decoder.channels(),
            channels_us: decoder.channels_microseconds(),
            link,
            tx_power_mw: link.tx_power_mw(tx_power),
            stats: decoder.statistics(),
        }
    }
}
