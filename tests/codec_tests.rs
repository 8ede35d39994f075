//! Codec Tests
//!
//! Tests for request envelope encoding and frame header decoding.

use bzquery::protocol::{decode_frame_header, encode_command, FRAME_HEADER_SIZE};

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_command_wire_format() {
    let request = encode_command("qg").unwrap();

    // Expected: [0x00 0x00][q g]
    //           zero len    code as big-endian u16
    assert_eq!(request, [0x00, 0x00, b'q', b'g']);
}

#[test]
fn test_encode_command_qp() {
    let request = encode_command("qp").unwrap();
    assert_eq!(request, [0x00, 0x00, b'q', b'p']);
}

#[test]
fn test_encode_command_too_short() {
    let result = encode_command("q");
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("exactly 2 characters"));
}

#[test]
fn test_encode_command_too_long() {
    let result = encode_command("qgx");
    assert!(result.is_err());
}

#[test]
fn test_encode_command_empty() {
    assert!(encode_command("").is_err());
}

#[test]
fn test_encode_command_multibyte_char_rejected() {
    // One char but 2+ bytes in UTF-8 is fine only if it is exactly 2 bytes;
    // 'é' is 2 bytes so it encodes, '€' is 3 bytes so it must fail.
    assert!(encode_command("é").is_ok());
    assert!(encode_command("€").is_err());
}

// =============================================================================
// Frame Header Decoding Tests
// =============================================================================

#[test]
fn test_decode_frame_header() {
    let header = [0x00, 0x2A, b'q', b'g'];
    let (length, code) = decode_frame_header(&header);

    assert_eq!(length, 42);
    assert_eq!(&code, b"qg");
}

#[test]
fn test_decode_frame_header_zero_length() {
    let header = [0x00, 0x00, b't', b'u'];
    let (length, code) = decode_frame_header(&header);

    assert_eq!(length, 0);
    assert_eq!(&code, b"tu");
}

#[test]
fn test_decode_frame_header_max_length() {
    let header = [0xFF, 0xFF, 0x00, 0xFF];
    let (length, code) = decode_frame_header(&header);

    // Codes are raw bytes, not required to be printable
    assert_eq!(length, 0xFFFF);
    assert_eq!(code, [0x00, 0xFF]);
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_command_code_round_trip() {
    // A peer that echoes the request envelope back as a frame header
    // must see the exact code bytes for every valid command.
    for command in ["qg", "qp", "tu", "ap", "xx", "zz"] {
        let request = encode_command(command).unwrap();
        assert_eq!(request.len(), FRAME_HEADER_SIZE);

        let (length, code) = decode_frame_header(&request);
        assert_eq!(length, 0);
        assert_eq!(&code, command.as_bytes());
    }
}
