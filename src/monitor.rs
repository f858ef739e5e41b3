//! # Console Monitor
//!
//! Text rendering of decoder state for the `crsf-rx` binary.

use crate::crsf::decoder::FrameDecoder;
use crate::crsf::link_stats::TxPowerTable;
use crate::crsf::protocol::{LinkStatistics, CRSF_NUM_CHANNELS};
use crate::crsf::stats::Statistics;

const RULE_WIDTH: usize = 80;
const CHANNELS_PER_ROW: usize = 4;

/// Raw and microsecond channel values, four per row
///
/// ```text
/// Ch 1:  992 (1500µs)  Ch 2:  172 (1000µs)  ...
/// ```
pub fn format_channels(decoder: &FrameDecoder) -> String {
    let raw = decoder.channels();
    let micros = decoder.channels_microseconds();

    let rows: String = (0..CRSF_NUM_CHANNELS)
        .step_by(CHANNELS_PER_ROW)
        .map(|row| {
            let line: Vec<String> = (row..row + CHANNELS_PER_ROW)
                .map(|ch| format!("Ch{:2}: {:4} ({:4}µs)", ch + 1, raw[ch], micros[ch]))
                .collect();
            format!("{}\n", line.join("  "))
        })
        .collect();

    format!(
        "RC Channels (11-bit / microseconds):\n{}\n{}",
        "-".repeat(RULE_WIDTH),
        rows
    )
}

/// Link statistics block
pub fn format_link_statistics(stats: &LinkStatistics, tx_power: &TxPowerTable) -> String {
    let power = match stats.tx_power_mw(tx_power) {
        Some(mw) => format!("{:4} mW", mw),
        None => format!("code {}", stats.tx_power),
    };

    let downlink = stats
        .downlink
        .map(|d| {
            format!(
                "Downlink:      {} dBm, LQ {} %, SNR {} dB\n",
                d.rssi, d.link_quality, d.snr
            )
        })
        .unwrap_or_default();

    format!(
        "Link Statistics:\n{}\n\
         RSSI 1:        {:4} dBm\n\
         RSSI 2:        {:4} dBm\n\
         Link Quality:  {:4} %\n\
         SNR:           {:4} dB\n\
         Active Ant:    {:4}\n\
         RF Mode:       {:4}\n\
         TX Power:      {}\n\
         {}",
        "-".repeat(RULE_WIDTH),
        stats.rssi1,
        stats.rssi2,
        stats.link_quality,
        stats.snr,
        stats.active_antenna,
        stats.rf_mode,
        power,
        downlink
    )
}

/// One-line frame counter summary
pub fn format_statistics(stats: &Statistics) -> String {
    format!(
        "Frames: {}, Errors: {}, Error Rate: {:.2}%",
        stats.attempts, stats.errors, stats.error_rate
    )
}

/// Full snapshot as printed every monitor interval
pub fn format_snapshot(decoder: &FrameDecoder, tx_power: &TxPowerTable) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "{rule}\n{}\n{rule}\n{}\n{}",
        format_channels(decoder),
        format_link_statistics(&decoder.link_statistics(), tx_power),
        format_statistics(&decoder.statistics()),
    )
}
