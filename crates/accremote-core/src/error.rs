//! Error handling for accremote
//!
//! Every failure in a remote-control session is recoverable. The types here
//! exist so that each failure can be named, logged into the operator console
//! and traced, never so that it can abort the session:
//! - Connection errors (port open, read, write, flush, close)
//! - Protocol errors (undecodable inbound text, malformed telemetry field)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Connection error type
///
/// Represents failures of the serial link itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Failed to open port
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The name of the port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// Read from the port failed
    #[error("Read failed: {reason}")]
    Read {
        /// The reason the read failed.
        reason: String,
    },

    /// Write to the port failed
    ///
    /// The command is kept for tracing but left out of the message, which
    /// lands in the console log the telemetry parser scans.
    #[error("Write failed: {reason}")]
    Write {
        /// The command that could not be written.
        command: String,
        /// The reason the write failed.
        reason: String,
    },

    /// Flushing the port buffers failed
    #[error("Flush failed: {reason}")]
    Flush {
        /// The reason the flush failed.
        reason: String,
    },

    /// Closing the port failed
    #[error("Close failed: {reason}")]
    Close {
        /// The reason the close failed.
        reason: String,
    },

    /// No open link
    #[error("Not connected")]
    NotConnected,
}

impl ConnectionError {
    /// Build a [`ConnectionError::FailedToOpen`] from any displayable cause
    pub fn failed_to_open(port: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::FailedToOpen {
            port: port.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`ConnectionError::Read`] from any displayable cause
    pub fn read(reason: impl std::fmt::Display) -> Self {
        Self::Read {
            reason: reason.to_string(),
        }
    }

    /// Build a [`ConnectionError::Write`] for `command`
    pub fn write(command: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Write {
            command: command.into(),
            reason: reason.to_string(),
        }
    }
}

/// Protocol error type
///
/// Represents inbound data that could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Inbound bytes are not valid UTF-8 text
    #[error("invalid text at byte {valid_up_to} of {len}-byte chunk")]
    Decode {
        /// Length of the valid prefix.
        valid_up_to: usize,
        /// Length of the rejected chunk.
        len: usize,
    },

    /// The field after a telemetry tag is not a number
    #[error("telemetry field {field:?} is not numeric")]
    TelemetryField {
        /// The raw field text.
        field: String,
    },

    /// The telemetry field runs past the end of the buffer
    #[error("telemetry field truncated: {available} of {expected} characters")]
    TelemetryTruncated {
        /// Characters available after the tag.
        available: usize,
        /// Characters required.
        expected: usize,
    },
}

impl From<std::string::FromUtf8Error> for ProtocolError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Decode {
            valid_up_to: err.utf8_error().valid_up_to(),
            len: err.as_bytes().len(),
        }
    }
}

/// Main error type for accremote
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Protocol error
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = ConnectionError::failed_to_open("/dev/ttyFAKE", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Failed to open port /dev/ttyFAKE: No such file or directory"
        );

        let err = ConnectionError::write("acc: 12;", "broken pipe");
        assert_eq!(err.to_string(), "Write failed: broken pipe");
        assert!(!err.to_string().contains("acc:"));

        assert_eq!(ConnectionError::NotConnected.to_string(), "Not connected");
    }

    #[test]
    fn test_decode_error_from_utf8() {
        let err: ProtocolError = String::from_utf8(vec![b'o', b'k', 0xff, b'\n'])
            .unwrap_err()
            .into();
        assert_eq!(
            err,
            ProtocolError::Decode {
                valid_up_to: 2,
                len: 4
            }
        );
        assert_eq!(err.to_string(), "invalid text at byte 2 of 4-byte chunk");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ConnectionError::NotConnected.into();
        assert!(matches!(err, Error::Connection(ConnectionError::NotConnected)));
        assert_eq!(err.to_string(), "Not connected");

        let err: Error = ProtocolError::TelemetryField {
            field: "x1".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Protocol(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
