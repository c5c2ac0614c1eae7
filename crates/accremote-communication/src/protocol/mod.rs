//! The `acc` text protocol
//!
//! Outbound, the panel sends `acc: N;` throttle commands, a bare `y` to start
//! and `stop;` to stop. Inbound, the device writes free text in which
//! `acc:` followed by a three character number reports the current
//! throttle level.

pub mod command;
pub mod telemetry;

use accremote_core::ProtocolError;

/// Decode an inbound chunk as text
///
/// Undecodable chunks are rejected whole; nothing of them reaches the log.
pub fn decode_line(bytes: Vec<u8>) -> Result<String, ProtocolError> {
    Ok(String::from_utf8(bytes)?)
}

/// Decodes successive inbound chunks
///
/// A read can end in the middle of a multi-byte character. Those trailing
/// bytes are held back and prepended to the next chunk instead of failing
/// both halves.
#[derive(Debug, Clone, Default)]
pub struct InboundDecoder {
    carry: Vec<u8>,
}

impl InboundDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, holding back an incomplete trailing character
    pub fn decode(&mut self, chunk: Vec<u8>) -> Result<String, ProtocolError> {
        let mut bytes = if self.carry.is_empty() {
            chunk
        } else {
            let mut bytes = std::mem::take(&mut self.carry);
            bytes.extend_from_slice(&chunk);
            bytes
        };

        if let Err(e) = std::str::from_utf8(&bytes) {
            // error_len() is None only when the input ends mid-character.
            if e.error_len().is_none() {
                self.carry = bytes.split_off(e.valid_up_to());
            }
        }

        decode_line(bytes)
    }

    /// Bytes held back for the next chunk
    pub fn pending(&self) -> &[u8] {
        &self.carry
    }

    /// Drop held back bytes
    pub fn reset(&mut self) {
        self.carry.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line(b"acc:042\n".to_vec()).unwrap(), "acc:042\n");
        assert!(matches!(
            decode_line(vec![0xc3, 0x28]),
            Err(ProtocolError::Decode { valid_up_to: 0, len: 2 })
        ));
    }

    #[test]
    fn test_decoder_joins_split_character() {
        let mut decoder = InboundDecoder::new();

        assert_eq!(decoder.decode(b"caf\xc3".to_vec()).unwrap(), "caf");
        assert_eq!(decoder.pending(), b"\xc3");

        assert_eq!(
            decoder.decode(b"\xa9 acc:042\n".to_vec()).unwrap(),
            "\u{e9} acc:042\n"
        );
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn test_decoder_rejects_invalid_bytes() {
        let mut decoder = InboundDecoder::new();
        assert!(matches!(
            decoder.decode(vec![b'a', 0xff, b'\n']),
            Err(ProtocolError::Decode { valid_up_to: 1, len: 3 })
        ));
        assert!(decoder.pending().is_empty());
        assert_eq!(decoder.decode(b"ok\n".to_vec()).unwrap(), "ok\n");
    }

    #[test]
    fn test_decoder_reset_drops_carry() {
        let mut decoder = InboundDecoder::new();
        decoder.decode(vec![0xe2, 0x82]).unwrap();
        assert_eq!(decoder.pending(), &[0xe2, 0x82]);

        decoder.reset();
        assert!(decoder.pending().is_empty());
    }
}
