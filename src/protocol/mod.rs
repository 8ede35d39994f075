//! Protocol Module
//!
//! Defines the wire format of the BZFS status query protocol.
//!
//! ## Greeting (server -> client, once per connection)
//! ```text
//! ┌───────────┬──────────────┬─────────────┐
//! │ Magic (4) │ Version (4)  │ Session (1) │
//! └───────────┴──────────────┴─────────────┘
//! ```
//! Magic is the literal `BZFS`; version is a 4-character identifier
//! (e.g. `0026`); session is a server-assigned opaque byte.
//!
//! ## Request Format
//! ```text
//! ┌──────────┬──────────┐
//! │ Zero (2) │ Code (2) │
//! └──────────┴──────────┘
//! ```
//! A zero length field followed by a 2-character ASCII command code read
//! as a big-endian u16.
//!
//! ## Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Len (2)  │ Code (2) │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//! Big-endian payload length, 2 raw code bytes, then exactly `Len`
//! payload bytes.
//!
//! ## Query Commands
//! - `qg`: game info; reply carries the same code
//! - `qp`: team/player counts; followed by one `tu` frame (team block)
//!   and then one `ap` frame per player

mod codec;
mod decode;

pub use codec::{
    decode_frame_header, encode_command, CommandCode, COMMAND_SIZE, FRAME_HEADER_SIZE,
    GREETING_SIZE, MAGIC,
};
pub use decode::{
    decode_game_info, decode_player_counts, decode_player_record, decode_team_block, team_name,
    GameInfo, PlayerRecord, PlayerType, ShakeInfo, TeamRecord, GAME_INFO_SIZE,
    PLAYER_COUNTS_SIZE, PLAYER_RECORD_SIZE, STYLE_FLAGS, TEAM_NAMES,
};
