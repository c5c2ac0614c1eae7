//! Session data model
//!
//! Values a front-end samples from or feeds into a remote-control session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest throttle position accepted from the operator
pub const THROTTLE_MIN: f64 = 0.0;

/// Highest throttle position accepted from the operator
pub const THROTTLE_MAX: f64 = 100.0;

/// Connection state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    /// No open transport
    #[default]
    Disconnected,
    /// A transport is held and reports itself open
    Connected,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected => write!(f, "Connected"),
        }
    }
}

/// Telemetry value derived from the console log
///
/// `present` stays false until the first successfully parsed tag. Once a
/// value has been seen it is only replaced by a newer successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TelemetryReading {
    /// Last parsed value
    pub value: i32,
    /// Whether any value has been parsed yet
    pub present: bool,
}

impl TelemetryReading {
    /// A reading holding `value`
    pub fn new(value: i32) -> Self {
        Self {
            value,
            present: true,
        }
    }
}

/// The operator's current throttle position
///
/// This is a sampled value, not a queued message: each tick reads whatever
/// the position is at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ThrottleIntent {
    requested_value: f64,
}

impl ThrottleIntent {
    /// Create an intent, clamping to `THROTTLE_MIN..=THROTTLE_MAX`
    ///
    /// Non-finite input is treated as zero.
    pub fn new(value: f64) -> Self {
        let requested_value = if value.is_finite() {
            value.clamp(THROTTLE_MIN, THROTTLE_MAX)
        } else {
            THROTTLE_MIN
        };
        Self { requested_value }
    }

    /// The requested position, possibly fractional
    pub fn value(&self) -> f64 {
        self.requested_value
    }

    /// Integer part of the requested position (truncated, never rounded)
    pub fn whole(&self) -> i32 {
        self.requested_value.trunc() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_intent_truncates() {
        assert_eq!(ThrottleIntent::new(55.7).whole(), 55);
        assert_eq!(ThrottleIntent::new(99.999).whole(), 99);
        assert_eq!(ThrottleIntent::new(0.4).whole(), 0);
    }

    #[test]
    fn test_throttle_intent_clamps() {
        assert_eq!(ThrottleIntent::new(-3.0).value(), 0.0);
        assert_eq!(ThrottleIntent::new(250.0).value(), 100.0);
        assert_eq!(ThrottleIntent::new(f64::NAN).value(), 0.0);
        assert_eq!(ThrottleIntent::new(f64::INFINITY).value(), 0.0);
    }

    #[test]
    fn test_link_state_serde() {
        assert_eq!(LinkState::default(), LinkState::Disconnected);
        let json = serde_json::to_string(&LinkState::Connected).unwrap();
        assert_eq!(json, "\"connected\"");
        assert_eq!(LinkState::Connected.to_string(), "Connected");
    }

    #[test]
    fn test_telemetry_reading_default_absent() {
        let reading = TelemetryReading::default();
        assert!(!reading.present);
        assert_eq!(TelemetryReading::new(42).value, 42);
    }
}
