//! Operator intents
//!
//! One line typed at the console becomes one [`Intent`]. Parsing is strict
//! about arguments so that a typo never turns into a throttle command.

use std::str::FromStr;
use thiserror::Error;

/// Something the operator asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Open a link, optionally overriding the configured port and baud rate
    Connect {
        /// Port to open
        port: Option<String>,
        /// Baud rate to use
        baud_rate: Option<u32>,
    },
    /// Send the start command
    Start,
    /// Send the stop command
    Stop,
    /// Clear the console and drop the link
    Reset,
    /// Clear the console
    Clear,
    /// Move the throttle to a position in 0..=100
    Throttle(f64),
    /// Print connection and throttle state
    Status,
    /// List serial ports
    Ports,
    /// Print the command list
    Help,
    /// Leave the program
    Quit,
}

/// Why a console line could not be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    /// Nothing was typed
    #[error("empty command")]
    Empty,

    /// The command word is unknown
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    /// A required argument is missing
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        /// The command.
        command: &'static str,
        /// Description of the missing argument.
        argument: &'static str,
    },

    /// An argument is not a valid number
    #[error("'{value}' is not a valid {argument}")]
    InvalidNumber {
        /// Description of the argument.
        argument: &'static str,
        /// The rejected text.
        value: String,
    },

    /// Too many arguments
    #[error("unexpected argument '{0}'")]
    Unexpected(String),
}

/// Command list printed by `help`
pub const HELP: &str = "\
commands:
  connect [port] [baud]  open the serial link
  start                  send start
  stop                   emergency stop (throttle to 0)
  acc <0-100>            set the throttle position
  reset                  clear the console and close the link
  clear                  clear the console
  status                 show link and throttle state
  ports                  list serial ports
  help                   show this list
  quit                   stop, close and exit";

impl FromStr for Intent {
    type Err = IntentError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(IntentError::Empty)?.to_ascii_lowercase();

        let intent = match command.as_str() {
            "connect" | "c" => {
                let port = words.next().map(str::to_string);
                let baud_rate = words
                    .next()
                    .map(|word| {
                        word.parse::<u32>()
                            .ok()
                            .filter(|baud| *baud > 0)
                            .ok_or_else(|| IntentError::InvalidNumber {
                                argument: "baud rate",
                                value: word.to_string(),
                            })
                    })
                    .transpose()?;
                Intent::Connect { port, baud_rate }
            }
            "start" | "y" => Intent::Start,
            "stop" | "s" => Intent::Stop,
            "reset" => Intent::Reset,
            "clear" => Intent::Clear,
            "acc" | "throttle" => {
                let word = words.next().ok_or(IntentError::MissingArgument {
                    command: "acc",
                    argument: "a position between 0 and 100",
                })?;
                let value = word
                    .parse::<f64>()
                    .ok()
                    .filter(|value| (0.0..=100.0).contains(value))
                    .ok_or_else(|| IntentError::InvalidNumber {
                        argument: "throttle position",
                        value: word.to_string(),
                    })?;
                Intent::Throttle(value)
            }
            "status" => Intent::Status,
            "ports" => Intent::Ports,
            "help" | "?" => Intent::Help,
            "quit" | "exit" | "q" => Intent::Quit,
            _ => return Err(IntentError::Unknown(command)),
        };

        match words.next() {
            Some(extra) => Err(IntentError::Unexpected(extra.to_string())),
            None => Ok(intent),
        }
    }
}
