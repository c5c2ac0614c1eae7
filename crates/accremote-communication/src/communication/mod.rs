//! Transport abstraction
//!
//! A transport is a byte stream to the device with non-blocking line reads.
//! The session only ever talks to the device through these traits, so a real
//! serial port and an in-memory test double are interchangeable.

pub mod serial;

use accremote_core::ConnectionError;
use accremote_settings::ConnectionSettings;
use std::io;
use std::time::Duration;

/// Parameters used to open a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Port name (e.g., "/dev/ttyACM0", "COM3")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout; zero makes every read return immediately
    pub read_timeout: Duration,
}

impl ConnectionParams {
    /// Non-blocking parameters for `port` at `baud_rate`
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            read_timeout: Duration::ZERO,
        }
    }
}

impl From<&ConnectionSettings> for ConnectionParams {
    fn from(settings: &ConnectionSettings) -> Self {
        Self {
            port: settings.port.clone(),
            baud_rate: settings.baud_rate,
            read_timeout: settings.read_timeout(),
        }
    }
}

/// An open byte stream to the device
pub trait Transport: Send {
    /// Port name this transport was opened on
    fn name(&self) -> &str;

    /// Whether the underlying handle is still open
    fn is_open(&self) -> bool;

    /// Read every complete line available, or whatever bytes are available
    /// if no full line is
    ///
    /// Never blocks waiting for data. An empty vector means nothing was
    /// available, which is the normal outcome of most reads.
    fn read_lines(&mut self) -> io::Result<Vec<u8>>;

    /// Write all of `data`
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Discard unread input
    fn flush_input(&mut self) -> io::Result<()>;

    /// Discard unsent output
    fn flush_output(&mut self) -> io::Result<()>;

    /// Close the handle; `is_open` returns false afterwards
    fn close(&mut self) -> io::Result<()>;
}

/// Opens transports for a session
pub trait TransportFactory {
    /// Open a transport with `params`
    fn open(&self, params: &ConnectionParams) -> Result<Box<dyn Transport>, ConnectionError>;
}
