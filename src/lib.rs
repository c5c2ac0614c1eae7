//! # accremote
//!
//! A serial remote-control panel for throttle-driven devices:
//! - Connect to a serial port and keep a live console of device output
//! - Send throttle (`acc: N;`), start (`y`) and stop (`stop;`) commands
//! - Mirror the device's `acc:` telemetry into a throttle progress value
//!
//! ## Architecture
//!
//! accremote is organized as a workspace with multiple crates:
//!
//! 1. **accremote-core** - Error taxonomy and session data types
//! 2. **accremote-communication** - Transports, the `acc` protocol, the session manager
//! 3. **accremote-settings** - Configuration files and validation
//! 4. **accremote** - Console front-end binary that drives the session

#![allow(dead_code)]

pub mod cli;
pub mod frontend;
pub mod intent;

pub use accremote_communication::{
    list_ports, ConsoleLog, SerialPortInfo, SerialTransportFactory, SessionManager, Transport,
    TransportFactory,
};
pub use accremote_core::{
    ConnectionError, Error, LinkState, ProtocolError, Result, TelemetryReading, ThrottleIntent,
};
pub use accremote_settings::{Config, ConnectionSettings, ConsoleSettings};
pub use cli::Cli;
pub use intent::{Intent, IntentError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout to the operator console
/// - RUST_LOG environment variable support (default level INFO)
/// - Pretty or JSON formatting
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(base.json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(base.pretty())
            .try_init()?;
    }

    Ok(())
}
