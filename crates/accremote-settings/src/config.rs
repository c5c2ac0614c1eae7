//! Configuration and settings management for accremote
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform configuration directory.
//!
//! Configuration is organized into two sections:
//! - Connection settings (port, baud rate, read timeout)
//! - Console settings (log capacity, tick cadence)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Serial device opened when none is given
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Symbol rate used when none is given
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Cadence at which the front-end drives the session
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

const DEFAULT_MAX_LOG_BYTES: usize = 256 * 1024;
const MIN_LOG_BYTES: usize = 64;
const MAX_TICK_RATE_HZ: u32 = 1000;

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Device path of the serial port
    pub port: String,
    /// Baud rate for the serial link
    pub baud_rate: u32,
    /// Read timeout in milliseconds (0 = non-blocking)
    pub read_timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: 0,
        }
    }
}

impl ConnectionSettings {
    /// Read timeout as a duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Operator console settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Maximum size of the console log in bytes (0 = unbounded)
    pub max_log_bytes: usize,
    /// How often the front-end ticks the session, in Hz
    pub tick_rate_hz: u32,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            max_log_bytes: DEFAULT_MAX_LOG_BYTES,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl ConsoleSettings {
    /// Log capacity, `None` when unbounded
    pub fn log_capacity(&self) -> Option<usize> {
        (self.max_log_bytes > 0).then_some(self.max_log_bytes)
    }

    /// Interval between ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate_hz.max(1)))
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionSettings,
    /// Console settings
    pub console: ConsoleSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file
    ///
    /// `<config_dir>/accremote/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("accremote").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from `path`, falling back to defaults if it does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.port.trim().is_empty() {
            return Err(ConfigError::MissingValue("connection.port".to_string()));
        }

        if self.connection.baud_rate == 0 {
            return Err(out_of_range("connection.baud_rate", self.connection.baud_rate));
        }

        if self.console.tick_rate_hz == 0 || self.console.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(out_of_range("console.tick_rate_hz", self.console.tick_rate_hz));
        }

        if self.console.max_log_bytes != 0 && self.console.max_log_bytes < MIN_LOG_BYTES {
            return Err(out_of_range("console.max_log_bytes", self.console.max_log_bytes));
        }

        Ok(())
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
