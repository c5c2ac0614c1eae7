//! # accremote Core
//!
//! Core types and error handling shared by every accremote crate.
//! Provides the error taxonomy for connection and protocol failures and the
//! small data model exposed to front-ends (telemetry reading, throttle intent,
//! link state).

pub mod data;
pub mod error;

pub use data::{LinkState, TelemetryReading, ThrottleIntent, THROTTLE_MAX, THROTTLE_MIN};
pub use error::{ConnectionError, Error, ProtocolError, Result};
