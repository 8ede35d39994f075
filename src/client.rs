//! Query Client
//!
//! Composes the connection, demultiplexer and domain decoders into the
//! two public query operations. One client owns one connection for one
//! logical session; there is no internal concurrency and no retry. A
//! query either fully succeeds or fails atomically, and a client whose
//! query timed out must be dropped (the read position is unspecified).

use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::QueryConfig;
use crate::error::Result;
use crate::net::{Connection, Deadline};
use crate::protocol::{
    decode_game_info, decode_player_counts, decode_player_record, decode_team_block, GameInfo,
    PlayerRecord, TeamRecord,
};

/// A single query session against one server
pub struct QueryClient {
    conn: Connection,
    timeout: Option<Duration>,
}

impl QueryClient {
    /// Connect and perform the handshake
    pub fn connect(config: &QueryConfig) -> Result<Self> {
        let conn = Connection::open(
            &config.host,
            config.port,
            config.timeout,
            &config.accepted_versions,
        )?;
        Ok(Self {
            conn,
            timeout: config.timeout,
        })
    }

    /// Protocol version negotiated at handshake time
    pub fn protocol_version(&self) -> &str {
        self.conn.protocol_version()
    }

    /// Server-assigned session id
    pub fn session_id(&self) -> u8 {
        self.conn.session_id()
    }

    /// Query the match configuration
    pub fn query_game(&mut self) -> Result<GameInfo> {
        let deadline = Deadline::after(self.timeout);
        let payload = self.conn.request("qg", deadline)?;
        decode_game_info(&payload)
    }

    /// Query per-team standings and per-player statistics
    ///
    /// The `qp` reply carries the counts; the team block follows in one
    /// `tu` frame and each player record in its own `ap` frame. Every
    /// exchange gets a fresh deadline from the configured timeout.
    pub fn query_players(
        &mut self,
    ) -> Result<(BTreeMap<&'static str, TeamRecord>, Vec<PlayerRecord>)> {
        let deadline = Deadline::after(self.timeout);
        let counts = self.conn.request("qp", deadline)?;
        let (num_teams, num_players) = decode_player_counts(&counts)?;
        tracing::debug!(
            "Server reports {} teams, {} players",
            num_teams,
            num_players
        );

        // The tu frame's own count prefix is authoritative; num_teams
        // from the counts reply is informational only.
        let deadline = Deadline::after(self.timeout);
        let team_block = self.conn.expect("tu", deadline)?;
        let teams = decode_team_block(&team_block)?;

        let mut players = Vec::with_capacity(num_players as usize);
        for _ in 0..num_players {
            let deadline = Deadline::after(self.timeout);
            let record = self.conn.expect("ap", deadline)?;
            players.push(decode_player_record(&record)?);
        }

        Ok((teams, players))
    }
}
