//! Remote-control session
//!
//! [`SessionManager`] owns the link to the device, the operator console log
//! and everything derived from it. A front-end drives it from a single
//! thread: it calls [`SessionManager::tick`] at a fixed cadence and forwards
//! operator intents (connect, start, stop, reset, clear, throttle position)
//! between ticks.
//!
//! Nothing here fails loudly. Open, read, write and teardown errors are
//! written to the console log (and traced) and the session carries on.
//! Operations that need a link silently do nothing without one.

use crate::communication::serial::SerialTransportFactory;
use crate::communication::{ConnectionParams, Transport, TransportFactory};
use crate::console::ConsoleLog;
use crate::protocol::command::{CommandEncoder, OutboundCommand};
use crate::protocol::InboundDecoder;
use crate::protocol::telemetry::TelemetryParser;
use accremote_core::{ConnectionError, LinkState, TelemetryReading, ThrottleIntent};
use accremote_settings::{Config, ConnectionSettings};

/// Owns one device link and its console
pub struct SessionManager<F: TransportFactory = SerialTransportFactory> {
    factory: F,
    settings: ConnectionSettings,
    transport: Option<Box<dyn Transport>>,
    log: ConsoleLog,
    decoder: InboundDecoder,
    encoder: CommandEncoder,
    telemetry: TelemetryParser,
    throttle: ThrottleIntent,
    progress: f64,
}

impl SessionManager<SerialTransportFactory> {
    /// Session over OS serial ports
    pub fn serial(config: &Config) -> Self {
        Self::new(SerialTransportFactory, config)
    }
}

impl<F: TransportFactory> SessionManager<F> {
    /// Create a disconnected session
    pub fn new(factory: F, config: &Config) -> Self {
        Self {
            factory,
            settings: config.connection.clone(),
            transport: None,
            log: ConsoleLog::new(config.console.log_capacity()),
            decoder: InboundDecoder::new(),
            encoder: CommandEncoder::new(),
            telemetry: TelemetryParser::new(),
            throttle: ThrottleIntent::default(),
            progress: 0.0,
        }
    }

    /// Connect to the configured port at the configured baud rate
    pub fn connect_default(&mut self) {
        let port = self.settings.port.clone();
        self.connect(&port, self.settings.baud_rate);
    }

    /// Connect to `port`, closing any current link first
    ///
    /// On failure the error is logged and the session is left without a link.
    /// The last throttle command survives, so an unchanged position is not
    /// sent again over the new link.
    pub fn connect(&mut self, port: &str, baud_rate: u32) {
        if let Some(mut transport) = self.transport.take() {
            self.log.line(format!("Close serial {}", transport.name()));
            tracing::info!("Closing serial port {}", transport.name());
            if let Err(e) = transport.close() {
                tracing::warn!("{}", ConnectionError::Close { reason: e.to_string() });
            }
        }

        self.log.line(format!("Connecting to serial {}", port));
        let params = ConnectionParams {
            port: port.to_string(),
            baud_rate,
            read_timeout: self.settings.read_timeout(),
        };

        match self.factory.open(&params) {
            Ok(transport) => {
                tracing::info!("Connected to {} at {} baud", port, baud_rate);
                self.transport = Some(transport);
                self.decoder.reset();
            }
            Err(e) => {
                tracing::warn!("Connection to {} failed: {}", port, e);
                self.log.line(format!("Connection Error {}", e));
            }
        }
    }

    /// One update step: read, forward the throttle position, refresh telemetry
    ///
    /// Does nothing without an open link.
    pub fn tick(&mut self) {
        if !self.is_connected() {
            return;
        }
        self.read_available();
        self.update_throttle();
        self.refresh_derived_state();
    }

    /// Read whatever the device has sent into the console log
    ///
    /// Read failures are logged and count as an empty read. Chunks that are
    /// not valid text are replaced by an error line; a character split
    /// across reads is completed by the next read.
    pub fn read_available(&mut self) {
        let Some(link) = self.link() else {
            return;
        };

        let data = match link.read_lines() {
            Ok(data) => data,
            Err(e) => {
                let e = ConnectionError::read(e);
                tracing::error!("{}", e);
                self.log.line(format!("Serial Error {}", e));
                return;
            }
        };
        if data.is_empty() {
            return;
        }

        tracing::trace!("Read {} bytes", data.len());
        match self.decoder.decode(data) {
            Ok(text) => self.log.append(&text),
            Err(e) => {
                tracing::warn!("Dropping inbound chunk: {}", e);
                self.log.line(format!("Read Error {}", e));
            }
        }
    }

    /// Send the sampled throttle position if it changed since the last send
    ///
    /// The command is recorded even when the write fails, so a failure is
    /// logged once and not retried. Progress only follows a successful write.
    pub fn update_throttle(&mut self) {
        if !self.is_connected() {
            return;
        }
        let Some(command) = self.encoder.next_throttle(self.throttle) else {
            return;
        };
        if self.transmit(&command) {
            self.progress = self.throttle.value();
        }
        self.encoder.record_throttle(command);
    }

    /// Mirror the most recent telemetry tag in the log into the progress value
    ///
    /// Leaves the progress value alone when there is no parseable tag.
    pub fn refresh_derived_state(&mut self) {
        if let Some(value) = self.telemetry.refresh(self.log.text()) {
            self.progress = f64::from(value);
        }
    }

    /// Send the start command
    pub fn send_start(&mut self) {
        if !self.is_connected() {
            return;
        }
        tracing::info!("Sending start");
        self.log.line("Sending \"y\" to start");
        self.transmit(&OutboundCommand::Start.encode());
    }

    /// Send the stop command and zero the throttle
    ///
    /// The throttle position and progress are zeroed even if the write fails.
    pub fn send_stop(&mut self) {
        if !self.is_connected() {
            return;
        }
        tracing::info!("Sending stop");
        self.log.line("Sending STOP");
        self.transmit(&OutboundCommand::Stop.encode());
        self.progress = 0.0;
        self.throttle = ThrottleIntent::default();
    }

    /// Clear the log and tear down the link
    ///
    /// Teardown is best-effort: flush and close failures are traced and the
    /// link is dropped regardless.
    pub fn reset(&mut self) {
        self.log.clear();
        if let Some(mut transport) = self.transport.take() {
            tracing::info!("Resetting session on {}", transport.name());
            if let Err(e) = transport.flush_input() {
                tracing::warn!("{}", ConnectionError::Flush { reason: e.to_string() });
            }
            if let Err(e) = transport.flush_output() {
                tracing::warn!("{}", ConnectionError::Flush { reason: e.to_string() });
            }
            if let Err(e) = transport.close() {
                tracing::warn!("{}", ConnectionError::Close { reason: e.to_string() });
            }
        }
        self.decoder.reset();
        self.encoder.reset();
    }

    /// Clear the console log, leaving the link alone
    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Set the operator's throttle position; sent on the next tick
    pub fn request_throttle(&mut self, value: f64) {
        self.throttle = ThrottleIntent::new(value);
    }

    /// Whether a link is held and reports itself open
    pub fn is_connected(&self) -> bool {
        self.transport
            .as_deref()
            .is_some_and(|transport| transport.is_open())
    }

    /// Connection state
    pub fn link_state(&self) -> LinkState {
        if self.is_connected() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }

    /// Port of the current link
    pub fn port_name(&self) -> Option<&str> {
        self.transport.as_deref().map(|transport| transport.name())
    }

    /// Console log text
    pub fn log_text(&self) -> &str {
        self.log.text()
    }

    /// Console log, for incremental rendering
    pub fn log(&self) -> &ConsoleLog {
        &self.log
    }

    /// Throttle progress indicator value
    pub fn throttle_progress(&self) -> f64 {
        self.progress
    }

    /// Operator's requested throttle position
    pub fn requested_throttle(&self) -> f64 {
        self.throttle.value()
    }

    /// Latest telemetry reading
    pub fn telemetry(&self) -> TelemetryReading {
        self.telemetry.reading()
    }

    /// Last throttle command sent, empty if none since the last reset
    pub fn last_throttle_command(&self) -> &str {
        self.encoder.last_throttle_command()
    }

    /// Connection settings used by [`SessionManager::connect_default`]
    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    fn link(&mut self) -> Option<&mut (dyn Transport + 'static)> {
        self.transport
            .as_deref_mut()
            .filter(|transport| transport.is_open())
    }

    fn transmit(&mut self, command: &str) -> bool {
        let result = match self.link() {
            Some(link) => link
                .write(command.as_bytes())
                .map_err(|e| ConnectionError::write(command, e)),
            None => Err(ConnectionError::NotConnected),
        };

        match result {
            Ok(()) => {
                tracing::debug!("Sent {:?}", command);
                true
            }
            Err(e) => {
                tracing::error!("Sending {:?}: {}", command, e);
                self.log.line(format!("Serial Error {}", e));
                false
            }
        }
    }
}

impl<F: TransportFactory> Drop for SessionManager<F> {
    fn drop(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close() {
                tracing::warn!("{}", ConnectionError::Close { reason: e.to_string() });
            }
        }
    }
}
