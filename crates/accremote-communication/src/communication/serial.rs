//! Serial port transport
//!
//! Provides the OS serial port implementation of [`Transport`] on top of the
//! `serialport` crate, plus port enumeration for front-ends.
//!
//! Reads never block: whatever the driver reports as available is pulled into
//! a pending buffer and handed out one line at a time. When no complete line
//! is pending, the partial line is returned as-is.

use super::{ConnectionParams, Transport, TransportFactory};
use accremote_core::{ConnectionError, Error, Result};
use serialport::{ClearBuffer, SerialPort};
use std::io::{self, Read, Write};

/// Information about an available serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyACM0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Arduino Serial Port")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            manufacturer: None,
            vid: None,
            pid: None,
        }
    }

    /// Set manufacturer
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }
}

/// List serial ports a device could be attached to
///
/// Filters to device-like names:
/// - Windows: COM* (e.g., COM1, COM3)
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        Error::Io(e.into())
    })?;

    Ok(ports
        .iter()
        .filter(|port| is_device_port(&port.port_name))
        .map(|port| {
            let info = SerialPortInfo::new(&port.port_name, port_description(port));
            match &port.port_type {
                serialport::SerialPortType::UsbPort(usb) => {
                    let info = info.with_usb_ids(usb.vid, usb.pid);
                    match &usb.manufacturer {
                        Some(mfg) => info.with_manufacturer(mfg),
                        None => info,
                    }
                }
                _ => info,
            }
        })
        .collect())
}

fn is_device_port(port_name: &str) -> bool {
    if let Some(number) = port_name.strip_prefix("COM") {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }

    ["/dev/ttyUSB", "/dev/ttyACM", "/dev/cu.usbserial-", "/dev/cu.usbmodem"]
        .iter()
        .any(|prefix| port_name.starts_with(prefix))
}

fn port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb) => format!(
            "USB {} {}",
            usb.manufacturer.as_deref().unwrap_or("Device"),
            usb.product.as_deref().unwrap_or("Serial Port")
        ),
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Split every complete line (up to and including the last `\n`) off `pending`
///
/// Without a newline, every pending byte is returned. Either way at most one
/// partial line stays behind.
fn take_lines(pending: &mut Vec<u8>) -> Vec<u8> {
    match pending.iter().rposition(|&b| b == b'\n') {
        Some(end) => pending.drain(..=end).collect(),
        None => std::mem::take(pending),
    }
}

fn not_open() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "serial port is closed")
}

/// Serial port transport backed by the `serialport` crate
pub struct SerialTransport {
    name: String,
    port: Option<Box<dyn SerialPort>>,
    pending: Vec<u8>,
}

impl SerialTransport {
    /// Wrap an already opened port
    pub fn new(name: impl Into<String>, port: Box<dyn SerialPort>) -> Self {
        Self {
            name: name.into(),
            port: Some(port),
            pending: Vec::new(),
        }
    }

    fn port_mut(&mut self) -> io::Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or_else(not_open)
    }

    fn fill_pending(&mut self) -> io::Result<()> {
        let port = self.port.as_mut().ok_or_else(not_open)?;
        let available = port.bytes_to_read().map_err(io::Error::from)? as usize;
        if available == 0 {
            return Ok(());
        }

        let start = self.pending.len();
        self.pending.resize(start + available, 0);
        match port.read(&mut self.pending[start..]) {
            Ok(n) => {
                self.pending.truncate(start + n);
                Ok(())
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                self.pending.truncate(start);
                Ok(())
            }
            Err(e) => {
                self.pending.truncate(start);
                Err(e)
            }
        }
    }
}

impl Transport for SerialTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn read_lines(&mut self) -> io::Result<Vec<u8>> {
        self.fill_pending()?;
        Ok(take_lines(&mut self.pending))
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.port_mut()?.write_all(data)
    }

    fn flush_input(&mut self) -> io::Result<()> {
        self.pending.clear();
        self.port_mut()?
            .clear(ClearBuffer::Input)
            .map_err(io::Error::from)
    }

    fn flush_output(&mut self) -> io::Result<()> {
        self.port_mut()?
            .clear(ClearBuffer::Output)
            .map_err(io::Error::from)
    }

    fn close(&mut self) -> io::Result<()> {
        self.pending.clear();
        // Dropping the handle releases the OS port.
        self.port.take();
        Ok(())
    }
}

/// Opens [`SerialTransport`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialTransportFactory;

impl TransportFactory for SerialTransportFactory {
    fn open(&self, params: &ConnectionParams) -> std::result::Result<Box<dyn Transport>, ConnectionError> {
        serialport::new(params.port.as_str(), params.baud_rate)
            .timeout(params.read_timeout)
            .open()
            .map(|port| Box::new(SerialTransport::new(&params.port, port)) as Box<dyn Transport>)
            .map_err(|e| {
                tracing::warn!("Failed to open serial port {}: {}", params.port, e);
                ConnectionError::failed_to_open(&params.port, e)
            })
    }
}
