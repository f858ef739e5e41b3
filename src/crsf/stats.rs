//! # Decode Statistics
//!
//! Running attempt/error counters for a decoder's lifetime.

use serde::Serialize;

/// Result of one decode attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Frame validated and applied
    Success,
    /// Frame validated but its type is not decoded; counts as an attempt only
    Unsupported,
    /// CRC mismatch
    ChecksumError,
    /// Payload length wrong for the frame type
    LengthError,
    /// Stray bytes dropped while resynchronizing, or buffer overflow
    GarbageDiscarded,
}

impl Outcome {
    /// True for outcomes counted as errors
    pub fn is_error(self) -> bool {
        !matches!(self, Outcome::Success | Outcome::Unsupported)
    }
}

/// Snapshot of the counters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Statistics {
    pub attempts: u64,
    pub errors: u64,
    /// Errors as a percentage of attempts (0 when there were none)
    pub error_rate: f64,
}

/// Accumulates decode outcomes
///
/// Counters only grow; call [`StatisticsTracker::reset`] to start a fresh
/// window.
#[derive(Debug, Clone, Default)]
pub struct StatisticsTracker {
    attempts: u64,
    errors: u64,
}

impl StatisticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt
    pub fn record(&mut self, outcome: Outcome) {
        self.attempts += 1;
        if outcome.is_error() {
            self.errors += 1;
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// Errors per attempt in percent
    ///
    /// # Examples
    ///
    /// ```
    /// use crsf_rx::crsf::stats::{Outcome, StatisticsTracker};
    ///
    /// let mut tracker = StatisticsTracker::new();
    /// assert_eq!(tracker.error_rate(), 0.0);
    ///
    /// tracker.record(Outcome::Success);
    /// tracker.record(Outcome::ChecksumError);
    /// assert_eq!(tracker.error_rate(), 50.0);
    /// ```
    pub fn error_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.errors as f64 / self.attempts as f64 * 100.0
    }

    pub fn snapshot(&self) -> Statistics {
        Statistics {
            attempts: self.attempts,
            errors: self.errors,
            error_rate: self.error_rate(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
