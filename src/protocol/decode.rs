//! Domain decoders
//!
//! Pure functions turning validated frame payloads into record values.
//! No I/O happens here; every function checks the payload length against
//! the shape it expects and fails with a decode error otherwise.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Buf;

use crate::error::{QueryError, Result};

/// Game info payload size: 21 big-endian u16 fields
pub const GAME_INFO_SIZE: usize = 42;

/// Counts payload size (immediate `qp` reply): numTeams + numPlayers
pub const PLAYER_COUNTS_SIZE: usize = 4;

/// One team record inside the `tu` frame: index + size + won + lost
const TEAM_RECORD_SIZE: usize = 8;

/// One `ap` frame: id (1) + five u16 fields (10) + callsign (32) + email (128)
pub const PLAYER_RECORD_SIZE: usize = 171;

const CALLSIGN_SIZE: usize = 32;
const EMAIL_SIZE: usize = 128;

/// Style option names and their wire bits.
/// Unknown bits in a style mask are silently ignored.
pub const STYLE_FLAGS: [(&str, u16); 9] = [
    ("CTF", 0x0001),
    ("flags", 0x0002),
    ("jumping", 0x0008),
    ("inertia", 0x0010),
    ("ricochet", 0x0020),
    ("shaking", 0x0040),
    ("antidote", 0x0080),
    ("handicap", 0x0100),
    ("rabbit-hunt", 0x0200),
];

/// Bit indicating the bad-flag shaking rules are active
const SHAKING_BIT: u16 = 0x0040;

/// Team names in wire-index order
pub const TEAM_NAMES: [&str; 7] = [
    "rogue", "red", "green", "blue", "purple", "observer", "rabbit",
];

/// Resolve a wire team index against the fixed name table
pub fn team_name(index: u16) -> Result<&'static str> {
    TEAM_NAMES
        .get(index as usize)
        .copied()
        .ok_or_else(|| QueryError::Decode(format!("team index {} out of range", index)))
}

// =============================================================================
// Record Types
// =============================================================================

/// Player classification as reported by the server
///
/// Unrecognized values are preserved rather than rejected so that newer
/// servers do not break older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerType {
    Tank,
    Observer,
    RobotTank,
    Unknown(u16),
}

impl From<u16> for PlayerType {
    fn from(value: u16) -> Self {
        match value {
            0 => PlayerType::Tank,
            1 => PlayerType::Observer,
            2 => PlayerType::RobotTank,
            n => PlayerType::Unknown(n),
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerType::Tank => write!(f, "tank"),
            PlayerType::Observer => write!(f, "observer"),
            PlayerType::RobotTank => write!(f, "robot tank"),
            PlayerType::Unknown(n) => write!(f, "unknown type {}", n),
        }
    }
}

/// Shaking rules, present only when the `shaking` style flag is set
#[derive(Debug, Clone, PartialEq)]
pub struct ShakeInfo {
    /// Wins required to shake a bad flag
    pub wins: u16,

    /// Seconds until a bad flag shakes off by itself
    pub timeout: f64,
}

/// Match configuration decoded from a `qg` reply
#[derive(Debug, Clone, PartialEq)]
pub struct GameInfo {
    /// Named style options resolved from the wire bitmask, in table order
    pub style: Vec<&'static str>,

    /// Team name -> (current size, max size)
    pub teams: BTreeMap<&'static str, (u16, u16)>,

    pub max_players: u16,
    pub max_shots: u16,
    pub max_player_score: u16,
    pub max_team_score: u16,

    /// Match time limit in seconds (tenths on the wire)
    pub max_time: f64,

    /// Elapsed match time in seconds (tenths on the wire)
    pub elapsed_time: f64,

    /// Present iff the `shaking` style flag is set
    pub shake: Option<ShakeInfo>,
}

/// One team's standings from the `tu` frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub team: &'static str,
    pub size: u16,
    pub won: u16,
    pub lost: u16,
}

impl TeamRecord {
    /// Net score: wins minus losses
    pub fn score(&self) -> i32 {
        i32::from(self.won) - i32::from(self.lost)
    }
}

/// One player's statistics from an `ap` frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: i8,
    pub player_type: PlayerType,
    pub team: &'static str,
    pub won: u16,
    pub lost: u16,
    pub team_kills: u16,
    pub callsign: String,
    pub email: String,
}

impl PlayerRecord {
    /// Net score: wins minus losses
    pub fn score(&self) -> i32 {
        i32::from(self.won) - i32::from(self.lost)
    }
}

// =============================================================================
// Decoders
// =============================================================================

/// Expand a style bitmask against the static flag table
///
/// Bits with no table entry are ignored.
fn decode_style(mask: u16) -> Vec<&'static str> {
    STYLE_FLAGS
        .iter()
        .filter(|(_, bit)| mask & bit != 0)
        .map(|(name, _)| *name)
        .collect()
}

/// Decode a `qg` reply payload into a GameInfo
///
/// The payload is 21 big-endian u16 fields in fixed order: style,
/// maxPlayers, maxShots, six team sizes (rogue..observer), six team
/// maxima, shakeWins, shakeTimeout, maxPlayerScore, maxTeamScore,
/// maxTime, elapsedTime. Time fields arrive in tenths of a second.
pub fn decode_game_info(payload: &[u8]) -> Result<GameInfo> {
    if payload.len() != GAME_INFO_SIZE {
        return Err(QueryError::Decode(format!(
            "game info payload must be {} bytes, got {}",
            GAME_INFO_SIZE,
            payload.len()
        )));
    }

    let mut buf = payload;
    let style_mask = buf.get_u16();
    let max_players = buf.get_u16();
    let max_shots = buf.get_u16();

    let mut sizes = [0u16; 6];
    for size in sizes.iter_mut() {
        *size = buf.get_u16();
    }
    let mut maxima = [0u16; 6];
    for max in maxima.iter_mut() {
        *max = buf.get_u16();
    }

    let shake_wins = buf.get_u16();
    let shake_timeout = buf.get_u16();
    let max_player_score = buf.get_u16();
    let max_team_score = buf.get_u16();
    let max_time = buf.get_u16();
    let elapsed_time = buf.get_u16();

    let style = decode_style(style_mask);

    // The qg reply carries capacities for the six joinable teams only;
    // the rabbit slot never appears here.
    let mut teams = BTreeMap::new();
    for (i, name) in TEAM_NAMES.iter().take(6).enumerate() {
        teams.insert(*name, (sizes[i], maxima[i]));
    }

    let shake = if style_mask & SHAKING_BIT != 0 {
        Some(ShakeInfo {
            wins: shake_wins,
            timeout: f64::from(shake_timeout) / 10.0,
        })
    } else {
        None
    };

    Ok(GameInfo {
        style,
        teams,
        max_players,
        max_shots,
        max_player_score,
        max_team_score,
        max_time: f64::from(max_time) / 10.0,
        elapsed_time: f64::from(elapsed_time) / 10.0,
        shake,
    })
}

/// Decode the immediate `qp` reply: (numTeams, numPlayers)
pub fn decode_player_counts(payload: &[u8]) -> Result<(u16, u16)> {
    if payload.len() != PLAYER_COUNTS_SIZE {
        return Err(QueryError::Decode(format!(
            "counts payload must be {} bytes, got {}",
            PLAYER_COUNTS_SIZE,
            payload.len()
        )));
    }

    let mut buf = payload;
    Ok((buf.get_u16(), buf.get_u16()))
}

/// Decode a `tu` frame payload into per-team standings
///
/// Format: 1-byte team count, then count fixed 8-byte records of
/// (team index, size, won, lost). The count prefix is authoritative;
/// the payload length must match it exactly.
pub fn decode_team_block(payload: &[u8]) -> Result<BTreeMap<&'static str, TeamRecord>> {
    if payload.is_empty() {
        return Err(QueryError::Decode(
            "team block payload is empty".to_string(),
        ));
    }

    let count = payload[0] as usize;
    let expected = 1 + count * TEAM_RECORD_SIZE;
    if payload.len() != expected {
        return Err(QueryError::Decode(format!(
            "team block with {} teams must be {} bytes, got {}",
            count,
            expected,
            payload.len()
        )));
    }

    let mut buf = &payload[1..];
    let mut teams = BTreeMap::new();
    for _ in 0..count {
        let index = buf.get_u16();
        let size = buf.get_u16();
        let won = buf.get_u16();
        let lost = buf.get_u16();
        let team = team_name(index)?;
        teams.insert(
            team,
            TeamRecord {
                team,
                size,
                won,
                lost,
            },
        );
    }

    Ok(teams)
}

/// Decode one `ap` frame payload into a PlayerRecord
///
/// Format: signed player id, then five big-endian u16 fields (type,
/// team index, won, lost, team kills), then a 32-byte NUL-padded
/// callsign and a 128-byte NUL-padded email address.
pub fn decode_player_record(payload: &[u8]) -> Result<PlayerRecord> {
    if payload.len() != PLAYER_RECORD_SIZE {
        return Err(QueryError::Decode(format!(
            "player record payload must be {} bytes, got {}",
            PLAYER_RECORD_SIZE,
            payload.len()
        )));
    }

    let mut buf = payload;
    let id = buf.get_i8();
    let player_type = PlayerType::from(buf.get_u16());
    let team = team_name(buf.get_u16())?;
    let won = buf.get_u16();
    let lost = buf.get_u16();
    let team_kills = buf.get_u16();

    let callsign = trim_padded_text(&buf[..CALLSIGN_SIZE]);
    let email = trim_padded_text(&buf[CALLSIGN_SIZE..CALLSIGN_SIZE + EMAIL_SIZE]);

    Ok(PlayerRecord {
        id,
        player_type,
        team,
        won,
        lost,
        team_kills,
        callsign,
        email,
    })
}

/// Strip the trailing NUL run from a fixed-width text field.
/// NUL bytes before the end of the text are kept as-is.
fn trim_padded_text(field: &[u8]) -> String {
    let end = field
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&field[..end]).into_owned()
}
