//! # accremote Communication
//!
//! Serial session management and the `acc` text protocol.
//!
//! A [`SessionManager`] owns the link to the device and the operator console
//! log. Each tick it reads whatever the device has sent, forwards the
//! operator's throttle position (only when it changed), and mirrors the most
//! recent `acc:` telemetry value back into the throttle progress indicator.

pub mod communication;
pub mod console;
pub mod protocol;
pub mod session;

pub use communication::{
    serial::{list_ports, SerialPortInfo, SerialTransport, SerialTransportFactory},
    ConnectionParams, Transport, TransportFactory,
};
pub use console::ConsoleLog;
pub use protocol::{
    command::{CommandEncoder, OutboundCommand, START_COMMAND, STOP_COMMAND},
    decode_line,
    InboundDecoder,
    telemetry::{extract_telemetry, TelemetryParser, TELEMETRY_FIELD_WIDTH, TELEMETRY_TAG},
};
pub use session::SessionManager;
