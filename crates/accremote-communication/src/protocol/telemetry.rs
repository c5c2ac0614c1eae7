//! Telemetry extraction
//!
//! The device reports its throttle level as `acc:` followed by a fixed-width
//! field of three characters (e.g. `acc:042`, `acc: 42`) somewhere in its
//! output. There is no framing: the parser scans the whole console log and
//! the most recent tag wins.

use accremote_core::{ProtocolError, TelemetryReading};

/// Marker preceding a telemetry field
pub const TELEMETRY_TAG: &str = "acc:";

/// Width of the field after [`TELEMETRY_TAG`], in characters
pub const TELEMETRY_FIELD_WIDTH: usize = 3;

/// Value of the last telemetry tag in `text`
///
/// Returns `None` when `text` has no tag at all, and an error when the last
/// tag is followed by something that is not a number or by fewer than
/// [`TELEMETRY_FIELD_WIDTH`] characters.
pub fn extract_telemetry(text: &str) -> Option<Result<i32, ProtocolError>> {
    let index = text.rfind(TELEMETRY_TAG)?;
    let rest = &text[index + TELEMETRY_TAG.len()..];

    let field = match rest.char_indices().nth(TELEMETRY_FIELD_WIDTH) {
        Some((end, _)) => &rest[..end],
        None => {
            let available = rest.chars().count();
            if available < TELEMETRY_FIELD_WIDTH {
                return Some(Err(ProtocolError::TelemetryTruncated {
                    available,
                    expected: TELEMETRY_FIELD_WIDTH,
                }));
            }
            rest
        }
    };

    Some(
        field
            .trim()
            .parse::<i32>()
            .map_err(|_| ProtocolError::TelemetryField {
                field: field.to_string(),
            }),
    )
}

/// Keeps the most recent telemetry reading
#[derive(Debug, Clone, Default)]
pub struct TelemetryParser {
    reading: TelemetryReading,
}

impl TelemetryParser {
    /// Create a parser with no reading yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the reading from `log`
    ///
    /// A missing or malformed tag leaves the previous reading in place.
    /// Returns the new value only when a tag was parsed.
    pub fn refresh(&mut self, log: &str) -> Option<i32> {
        match extract_telemetry(log)? {
            Ok(value) => {
                if self.reading.value != value || !self.reading.present {
                    tracing::debug!("Telemetry acc = {}", value);
                }
                self.reading = TelemetryReading::new(value);
                Some(value)
            }
            Err(e) => {
                tracing::trace!("Ignoring telemetry: {}", e);
                None
            }
        }
    }

    /// Current reading
    pub fn reading(&self) -> TelemetryReading {
        self.reading
    }
}
