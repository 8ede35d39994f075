//! Deadline-bounded receive
//!
//! A receive is bounded by an absolute point in time, not a per-read
//! timeout: one deadline is computed per operation and shared by every
//! partial read that operation performs. `receive` does exactly one
//! read once the socket is readable; accumulating an exact byte count
//! is the caller's job (see `Connection::read_exact_within`), so the
//! deadline semantics stay uniform whether the caller needs 4 header
//! bytes or a full player record.

use std::io::{ErrorKind, Read};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use crate::error::{QueryError, Result};

/// When a pending receive must give up
#[derive(Debug, Clone, Copy)]
pub enum Deadline {
    /// Block indefinitely
    None,

    /// Fail once this instant has passed
    At(Instant),
}

impl Deadline {
    /// Deadline `timeout` from now, or `Deadline::None` when unbounded
    pub fn after(timeout: Option<Duration>) -> Self {
        match timeout {
            Some(timeout) => Deadline::At(Instant::now() + timeout),
            None => Deadline::None,
        }
    }

    /// Time left before expiry
    ///
    /// Returns `None` for an unbounded deadline, or `Timeout` once the
    /// instant has passed.
    pub fn remaining(&self) -> Result<Option<Duration>> {
        match self {
            Deadline::None => Ok(None),
            Deadline::At(instant) => {
                let now = Instant::now();
                if *instant <= now {
                    return Err(QueryError::Timeout);
                }
                Ok(Some(*instant - now))
            }
        }
    }
}

/// Read up to `buf.len()` bytes from the stream, honoring the deadline
///
/// Waits (via the socket receive timeout) until the stream is readable
/// for at most the remaining time, then performs one read. Returns the
/// number of bytes read; `Ok(0)` means the peer closed the stream.
pub fn receive(stream: &TcpStream, buf: &mut [u8], deadline: Deadline) -> Result<usize> {
    let remaining = deadline.remaining()?;
    stream.set_read_timeout(remaining)?;

    let mut reader = stream;
    match reader.read(buf) {
        Ok(n) => Ok(n),
        Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
            Err(QueryError::Timeout)
        }
        Err(e) => Err(e.into()),
    }
}
