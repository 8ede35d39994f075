//! # bzquery
//!
//! A synchronous query client for the BZFS game server status protocol:
//! - magic/version handshake over a single TCP connection
//! - deadline-bounded receive loop with response demultiplexing
//! - binary decoding into match, team and player records
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    QueryClient                       │
//! │            (query_game / query_players)              │
//! └────────────┬────────────────────────────┬───────────┘
//!              │                            │
//!              ▼                            ▼
//!      ┌───────────────┐          ┌──────────────────┐
//!      │  Connection   │          │  Domain Decoders │
//!      │ (handshake +  │          │  (pure, no I/O)  │
//!      │  demux loop)  │          └──────────────────┘
//!      └───────┬───────┘
//!              │
//!      ┌───────▼───────┐   ┌──────────────┐
//!      │   Deadline    │   │ Framing Codec│
//!      │   Receiver    │   │ (4-byte hdr) │
//!      └───────────────┘   └──────────────┘
//! ```
//!
//! The event bus (`events`) and the tick-driven bot controller (`bot`)
//! are standalone host-side components with no protocol dependency.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod net;
pub mod client;

pub mod events;
pub mod bot;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{QueryError, Result};
pub use config::QueryConfig;
pub use client::QueryClient;
pub use protocol::{GameInfo, PlayerRecord, PlayerType, ShakeInfo, TeamRecord};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of bzquery
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
