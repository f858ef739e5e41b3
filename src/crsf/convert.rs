//! # Channel Value Conversion
//!
//! Pure mappings from raw 11-bit channel units to normalized stick
//! deflection and servo pulse width.
//!
//! | Raw | Normalized | Microseconds |
//! |-----|------------|--------------|
//! | 172 | -1.0 | 1000 |
//! | 992 | 0.0 | 1500 |
//! | 1811 | ~1.0 | 2000 |

use super::protocol::{
    RcChannels, CRSF_CHANNEL_VALUE_CENTER, CRSF_CHANNEL_VALUE_NOMINAL_MAX,
    CRSF_CHANNEL_VALUE_NOMINAL_MIN, CRSF_NUM_CHANNELS,
};

/// Raw units per unit of normalized deflection
const NORMALIZED_HALF_RANGE: f32 = 819.5;

/// Pulse width at the nominal minimum (µs)
const PULSE_MIN_US: i32 = 1000;

/// Pulse width at the nominal maximum (µs)
const PULSE_MAX_US: i32 = 2000;

/// Convert a raw value to a stick deflection in [-1.0, 1.0]
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::convert::to_normalized;
///
/// assert_eq!(to_normalized(992), 0.0);
/// assert_eq!(to_normalized(0), -1.0);
/// ```
pub fn to_normalized(raw: u16) -> f32 {
    let deflection = (raw as f32 - CRSF_CHANNEL_VALUE_CENTER as f32) / NORMALIZED_HALF_RANGE;
    deflection.clamp(-1.0, 1.0)
}

/// Convert a raw value to a pulse width in microseconds
///
/// Linear over 172-1811 → 1000-2000µs. Values outside the nominal range
/// extrapolate instead of clamping and round down, so raw 0 gives 895µs and
/// raw 2047 gives 2143µs.
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::convert::to_microseconds;
///
/// assert_eq!(to_microseconds(172), 1000);
/// assert_eq!(to_microseconds(992), 1500);
/// assert_eq!(to_microseconds(1811), 2000);
/// ```
pub fn to_microseconds(raw: u16) -> u16 {
    let span = (CRSF_CHANNEL_VALUE_NOMINAL_MAX - CRSF_CHANNEL_VALUE_NOMINAL_MIN) as i32;
    let offset = raw as i32 - CRSF_CHANNEL_VALUE_NOMINAL_MIN as i32;
    (PULSE_MIN_US + (offset * (PULSE_MAX_US - PULSE_MIN_US)).div_euclid(span)) as u16
}

/// Normalize all 16 channels
pub fn channels_to_normalized(channels: &RcChannels) -> [f32; CRSF_NUM_CHANNELS] {
    channels.map(to_normalized)
}

/// Convert all 16 channels to microseconds
pub fn channels_to_microseconds(channels: &RcChannels) -> [u16; CRSF_NUM_CHANNELS] {
    channels.map(to_microseconds)
}
