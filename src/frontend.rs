//! Line-oriented operator console
//!
//! Drives a [`SessionManager`] from a tokio current-thread runtime: a ticker
//! calls `tick()` at the configured rate while operator lines from stdin are
//! parsed into [`Intent`]s and applied between ticks. New console log text is
//! echoed to stdout after every step.

use crate::intent::{Intent, HELP};
use accremote_communication::{list_ports, SessionManager, TransportFactory};
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

/// Whether the console keeps running after an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Session plus the operator's terminal
pub struct Console<F: TransportFactory, W: Write> {
    session: SessionManager<F>,
    out: W,
    shown: u64,
}

impl<F: TransportFactory, W: Write> Console<F, W> {
    pub fn new(session: SessionManager<F>, out: W) -> Self {
        Self {
            session,
            out,
            shown: 0,
        }
    }

    pub fn session(&self) -> &SessionManager<F> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager<F> {
        &mut self.session
    }

    /// Apply one operator intent
    pub fn apply(&mut self, intent: Intent) -> io::Result<Flow> {
        tracing::debug!("Operator intent: {:?}", intent);
        match intent {
            Intent::Connect { port, baud_rate } => {
                let baud_rate = baud_rate.unwrap_or(self.session.settings().baud_rate);
                match port {
                    Some(port) => self.session.connect(&port, baud_rate),
                    None => {
                        let port = self.session.settings().port.clone();
                        self.session.connect(&port, baud_rate);
                    }
                }
            }
            Intent::Start => self.session.send_start(),
            Intent::Stop => self.session.send_stop(),
            Intent::Reset => self.session.reset(),
            Intent::Clear => self.session.clear(),
            Intent::Throttle(value) => self.session.request_throttle(value),
            Intent::Status => {
                let status = self.status_line();
                writeln!(self.out, "{}", status)?;
            }
            Intent::Ports => self.print_ports()?,
            Intent::Help => writeln!(self.out, "{}", HELP)?,
            Intent::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Parse and apply one line typed by the operator
    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        match line.parse::<Intent>() {
            Ok(intent) => self.apply(intent),
            Err(e) => {
                writeln!(self.out, "{}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Advance the session by one tick
    pub fn tick(&mut self) {
        self.session.tick();
    }

    /// Write log text appended since the last render
    pub fn render(&mut self) -> io::Result<()> {
        let log = self.session.log();
        let new = log.since(self.shown);
        if !new.is_empty() {
            self.out.write_all(new.as_bytes())?;
            self.out.flush()?;
        }
        self.shown = log.mark();
        Ok(())
    }

    /// Stop the device and release the link
    pub fn shutdown(&mut self) -> io::Result<()> {
        self.session.send_stop();
        self.render()?;
        self.session.reset();
        Ok(())
    }

    pub fn status_line(&self) -> String {
        let session = &self.session;
        let link = match session.port_name() {
            Some(port) if session.is_connected() => format!("{} ({})", session.link_state(), port),
            _ => session.link_state().to_string(),
        };
        let telemetry = session.telemetry();
        let reported = if telemetry.present {
            telemetry.value.to_string()
        } else {
            "-".to_string()
        };
        format!(
            "link: {} | throttle: {:.0} | progress: {:.0} | telemetry: {} | last sent: {}",
            link,
            session.requested_throttle(),
            session.throttle_progress(),
            reported,
            match session.last_throttle_command() {
                "" => "-",
                command => command,
            }
        )
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn print_ports(&mut self) -> io::Result<()> {
        match list_ports() {
            Ok(ports) if ports.is_empty() => writeln!(self.out, "no serial ports found"),
            Ok(ports) => {
                for port in ports {
                    writeln!(self.out, "{:<24} {}", port.port_name, port.description)?;
                }
                Ok(())
            }
            Err(e) => writeln!(self.out, "{}", e),
        }
    }
}

/// Run the console until the operator quits, stdin closes or Ctrl-C
pub async fn run<F: TransportFactory, W: Write>(
    mut console: Console<F, W>,
    tick_interval: Duration,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!("Console running, ticking every {:?}", tick_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => console.tick(),
            line = lines.next_line() => match line? {
                Some(line) => {
                    if console.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                None => {
                    tracing::info!("Input closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
        console.render()?;
    }

    console.shutdown()?;
    tracing::info!("Console stopped");
    Ok(())
}
