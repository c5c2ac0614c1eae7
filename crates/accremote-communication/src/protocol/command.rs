//! Outbound command encoding
//!
//! Throttle commands are sent every time the operator's position changes and
//! never otherwise: a tick that samples the same position as the last
//! transmitted command produces nothing. Start and stop are always sent.

use accremote_core::ThrottleIntent;
use std::fmt;

/// Bytes sent to start the device
pub const START_COMMAND: &str = "y";

/// Bytes sent to stop the device
pub const STOP_COMMAND: &str = "stop;";

/// A command the panel sends to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundCommand {
    /// Set the throttle level
    Throttle(i32),
    /// Start the device
    Start,
    /// Stop the device
    Stop,
}

impl OutboundCommand {
    /// Throttle command for the integer part of `intent`
    pub fn throttle(intent: ThrottleIntent) -> Self {
        Self::Throttle(intent.whole())
    }

    /// Wire representation
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OutboundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Throttle(level) => write!(f, "acc: {};", level),
            Self::Start => f.write_str(START_COMMAND),
            Self::Stop => f.write_str(STOP_COMMAND),
        }
    }
}

/// Tracks the last transmitted throttle command
#[derive(Debug, Clone, Default)]
pub struct CommandEncoder {
    last_throttle_command: String,
}

impl CommandEncoder {
    /// Create an encoder that has sent nothing yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Throttle command to send for `intent`, if it differs from the last one sent
    pub fn next_throttle(&self, intent: ThrottleIntent) -> Option<String> {
        let command = OutboundCommand::throttle(intent).encode();
        (command != self.last_throttle_command).then_some(command)
    }

    /// Record `command` as transmitted
    pub fn record_throttle(&mut self, command: String) {
        self.last_throttle_command = command;
    }

    /// Last transmitted throttle command, empty if none
    pub fn last_throttle_command(&self) -> &str {
        &self.last_throttle_command
    }

    /// Forget the last transmitted command
    pub fn reset(&mut self) {
        self.last_throttle_command.clear();
    }
}
