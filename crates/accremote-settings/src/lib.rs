//! accremote Settings Crate
//!
//! Handles application configuration: the serial link parameters and the
//! operator console behaviour, loaded from JSON or TOML files.

pub mod config;
pub mod error;

pub use config::{
    Config, ConnectionSettings, ConsoleSettings, DEFAULT_BAUD_RATE, DEFAULT_PORT,
    DEFAULT_TICK_RATE_HZ,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
