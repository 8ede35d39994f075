//! Network Module
//!
//! Socket ownership, the deadline-bounded receive primitive, the
//! greeting handshake, and response demultiplexing.

mod connection;
mod deadline;

pub use connection::Connection;
pub use deadline::{receive, Deadline};
