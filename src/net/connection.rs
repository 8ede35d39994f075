//! Connection and response demultiplexing
//!
//! Owns the socket. A connection only exists after a fully validated
//! handshake: the greeting's magic token and protocol version are
//! checked before the value is ever returned, and any failure drops
//! the socket. All frame reads go through one shared deadline per
//! operation; a connection that timed out mid-frame is left at an
//! unspecified read position and must be discarded by the caller.

use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::str;
use std::time::Duration;

use crate::error::{QueryError, Result};
use crate::net::deadline::{receive, Deadline};
use crate::protocol::{
    decode_frame_header, encode_command, CommandCode, FRAME_HEADER_SIZE, GREETING_SIZE, MAGIC,
};

/// An open, handshake-validated query connection
pub struct Connection {
    stream: TcpStream,

    /// Protocol version from the greeting (4 ASCII characters)
    protocol_version: String,

    /// Server-assigned session id, opaque
    session_id: u8,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect and perform the greeting handshake
    ///
    /// Reads the 9-byte greeting under one deadline derived from
    /// `timeout`, validates the magic token and checks the protocol
    /// version against `accepted_versions`. On any failure the socket
    /// is closed and no connection is produced.
    pub fn open(
        host: &str,
        port: u16,
        timeout: Option<Duration>,
        accepted_versions: &[String],
    ) -> Result<Self> {
        let stream = connect(host, port, timeout)?;
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let mut conn = Self {
            stream,
            protocol_version: String::new(),
            session_id: 0,
            peer_addr,
        };

        let deadline = Deadline::after(timeout);
        let greeting = conn.read_exact_within(GREETING_SIZE, deadline)?;

        if &greeting[..4] != MAGIC {
            return Err(QueryError::Protocol(format!(
                "not a recognized server: bad magic {:?}",
                &greeting[..4]
            )));
        }

        let version = String::from_utf8_lossy(&greeting[4..8]).into_owned();
        if !accepted_versions.iter().any(|v| *v == version) {
            return Err(QueryError::Protocol(format!(
                "incompatible protocol version {:?}",
                version
            )));
        }

        conn.protocol_version = version;
        conn.session_id = greeting[8];

        tracing::debug!(
            "Handshake with {} complete: protocol {}, session {}",
            conn.peer_addr,
            conn.protocol_version,
            conn.session_id
        );

        Ok(conn)
    }

    /// Protocol version string from the greeting
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Server-assigned session id
    pub fn session_id(&self) -> u8 {
        self.session_id
    }

    /// Peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Send a command and wait for the reply carrying the same code
    ///
    /// The deadline covers the whole exchange, including any foreign
    /// frames discarded along the way.
    pub fn request(&mut self, command: &str, deadline: Deadline) -> Result<Vec<u8>> {
        let request = encode_command(command)?;
        self.stream.write_all(&request)?;
        self.stream.flush()?;
        tracing::trace!("Sent command {:?} to {}", command, self.peer_addr);
        self.expect(command, deadline)
    }

    /// Wait for a frame with the given code, discarding others
    ///
    /// Servers interleave unsolicited frames (periodic game-time ticks)
    /// with solicited replies; anything that does not match is dropped
    /// and the loop continues until the deadline expires. The deadline
    /// is never reset between frames.
    pub fn expect(&mut self, code: &str, deadline: Deadline) -> Result<Vec<u8>> {
        let expected: CommandCode = match code.as_bytes() {
            [a, b] => [*a, *b],
            _ => {
                return Err(QueryError::Protocol(format!(
                    "response code must be exactly 2 characters, got {:?}",
                    code
                )))
            }
        };

        let mut last_seen: Option<CommandCode> = None;
        loop {
            let (frame_code, payload) = match self.read_frame(deadline) {
                Ok(frame) => frame,
                Err(QueryError::Timeout) => {
                    return Err(match last_seen {
                        Some(got) => QueryError::Protocol(format!(
                            "unexpected response code (got {:?}, expected {:?})",
                            printable(got),
                            code
                        )),
                        None => QueryError::Timeout,
                    });
                }
                Err(e) => return Err(e),
            };

            if frame_code == expected {
                return Ok(payload);
            }

            tracing::trace!(
                "Discarding frame {:?} ({} bytes) while waiting for {:?}",
                printable(frame_code),
                payload.len(),
                code
            );
            last_seen = Some(frame_code);
        }
    }

    /// Read one full frame: 4-byte header, then exactly `length` bytes
    fn read_frame(&mut self, deadline: Deadline) -> Result<(CommandCode, Vec<u8>)> {
        let mut header = [0u8; FRAME_HEADER_SIZE];
        header.copy_from_slice(&self.read_exact_within(FRAME_HEADER_SIZE, deadline)?);
        let (length, code) = decode_frame_header(&header);
        let payload = self.read_exact_within(length as usize, deadline)?;
        Ok((code, payload))
    }

    /// Accumulate exactly `size` bytes under one shared deadline
    ///
    /// Loops over the single-read receive primitive until the count is
    /// satisfied. A peer close mid-read is a protocol error: frames are
    /// never consumed partially.
    fn read_exact_within(&mut self, size: usize, deadline: Deadline) -> Result<Vec<u8>> {
        let mut data = vec![0u8; size];
        let mut filled = 0;
        while filled < size {
            let n = receive(&self.stream, &mut data[filled..], deadline)?;
            if n == 0 {
                return Err(QueryError::Protocol(if filled == 0 {
                    "no response from server".to_string()
                } else {
                    format!(
                        "connection closed mid-read ({} of {} bytes)",
                        filled, size
                    )
                }));
            }
            filled += n;
        }
        Ok(data)
    }
}

/// Establish the transport, with an optional connect timeout
fn connect(host: &str, port: u16, timeout: Option<Duration>) -> Result<TcpStream> {
    match timeout {
        None => TcpStream::connect((host, port)).map_err(QueryError::Connect),
        Some(timeout) => {
            // connect_timeout wants a resolved address; try each in turn
            let addrs = (host, port)
                .to_socket_addrs()
                .map_err(QueryError::Connect)?;
            let mut last_err = None;
            for addr in addrs {
                match TcpStream::connect_timeout(&addr, timeout) {
                    Ok(stream) => return Ok(stream),
                    Err(e) => last_err = Some(e),
                }
            }
            Err(QueryError::Connect(last_err.unwrap_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no addresses resolved",
                )
            })))
        }
    }
}

/// Render a response code for log and error messages
fn printable(code: CommandCode) -> String {
    str::from_utf8(&code)
        .map(|s| s.to_string())
        .unwrap_or_else(|_| format!("{:02x}{:02x}", code[0], code[1]))
}
