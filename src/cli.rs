//! Command line interface

use accremote_settings::{Config, SettingsResult};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// accremote: serial remote-control panel for throttle-driven devices
#[derive(Parser, Debug)]
#[command(name = "accremote", version, about)]
pub struct Cli {
    /// Serial port to connect to (overrides the config file)
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// Baud rate (overrides the config file)
    #[arg(short, long, global = true)]
    pub baud: Option<u32>,

    /// Session tick rate in Hz (overrides the config file)
    #[arg(long = "tick-rate", global = true)]
    pub tick_rate: Option<u32>,

    /// Config file path (TOML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long = "json-logs", global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the interactive console (default)
    Run {
        /// Connect to the configured port on startup
        #[arg(long)]
        connect: bool,
    },

    /// List serial ports and exit
    Ports,
}

impl Cli {
    /// Load the config file and apply command line overrides
    ///
    /// A missing file means defaults. The result is validated after the
    /// overrides so that a bad `--baud 0` is rejected like a bad file value.
    pub fn load_config(&self) -> SettingsResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)?,
            None => match Config::default_path() {
                Ok(path) => Config::load_or_default(&path)?,
                Err(e) => {
                    tracing::warn!("{}, using defaults", e);
                    Config::default()
                }
            },
        };

        if let Some(port) = &self.port {
            config.connection.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.connection.baud_rate = baud;
        }
        if let Some(hz) = self.tick_rate {
            config.console.tick_rate_hz = hz;
        }

        config.validate()?;
        Ok(config)
    }

    /// Subcommand to run, `run` when none was given
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Run { connect: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accremote_settings::SettingsError;

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "accremote",
            "--port",
            "/dev/ttyUSB0",
            "-b",
            "9600",
            "--tick-rate",
            "30",
            "--json-logs",
        ]);
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cli.baud, Some(9600));
        assert_eq!(cli.tick_rate, Some(30));
        assert!(cli.json_logs);
        assert_eq!(cli.command(), Command::Run { connect: false });
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["accremote", "ports"]);
        assert_eq!(cli.command(), Command::Ports);

        let cli = Cli::parse_from(["accremote", "run", "--connect", "--port", "/dev/ttyS1"]);
        assert_eq!(cli.command(), Command::Run { connect: true });
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyS1"));
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[connection]\nport = \"/dev/ttyS0\"\nbaud_rate = 57600\n").unwrap();

        let cli = Cli::parse_from([
            "accremote",
            "--config",
            path.to_str().unwrap(),
            "--baud",
            "9600",
        ]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.connection.port, "/dev/ttyS0");
        assert_eq!(config.connection.baud_rate, 9600);
        assert_eq!(config.console.tick_rate_hz, 60);
    }

    #[test]
    fn test_load_config_rejects_bad_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let cli = Cli::parse_from([
            "accremote",
            "--config",
            path.to_str().unwrap(),
            "--tick-rate",
            "0",
        ]);
        assert!(matches!(cli.load_config(), Err(SettingsError::Config(_))));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let cli = Cli::parse_from(["accremote", "--config", "/nonexistent/accremote.toml"]);
        assert!(matches!(cli.load_config(), Err(SettingsError::LoadError(_))));
    }
}
