//! Framing codec
//!
//! Encoding of request envelopes and decoding of response frame headers.
//! Code matching is not a codec concern: frames with unexpected codes are
//! handled by the response demultiplexer in `net::connection`.

use crate::error::{QueryError, Result};

/// Response frame header size: 2 bytes length + 2 bytes code
pub const FRAME_HEADER_SIZE: usize = 4;

/// Greeting size: 4 bytes magic + 4 bytes version + 1 byte session id
pub const GREETING_SIZE: usize = 9;

/// Command code length in bytes
pub const COMMAND_SIZE: usize = 2;

/// Magic token every BZFS server greets with
pub const MAGIC: &[u8; 4] = b"BZFS";

/// A 2-byte response code, not required to be printable
pub type CommandCode = [u8; 2];

/// Encode a command into the fixed request envelope
///
/// Format: zero length field (2) + command code as big-endian u16 (2).
/// Fails if the command is not exactly 2 bytes long.
pub fn encode_command(command: &str) -> Result<[u8; 4]> {
    let code = command.as_bytes();
    if code.len() != COMMAND_SIZE {
        return Err(QueryError::Protocol(format!(
            "command must be exactly 2 characters, got {:?}",
            command
        )));
    }

    let mut request = [0u8; 4];
    request[2] = code[0];
    request[3] = code[1];
    Ok(request)
}

/// Decode a response frame header
///
/// Returns the declared payload length and the 2 raw code bytes.
pub fn decode_frame_header(header: &[u8; FRAME_HEADER_SIZE]) -> (u16, CommandCode) {
    let length = u16::from_be_bytes([header[0], header[1]]);
    let code = [header[2], header[3]];
    (length, code)
}
