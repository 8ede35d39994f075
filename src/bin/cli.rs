//! bzquery CLI
//!
//! Queries one server and prints the game, team and player reports.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use bzquery::protocol::TEAM_NAMES;
use bzquery::{QueryClient, QueryConfig};

/// BZFS server status query tool
#[derive(Parser, Debug)]
#[command(name = "bzquery")]
#[command(about = "Query a BZFS game server for match, team and player status")]
#[command(version)]
struct Args {
    /// Server hostname
    #[arg(default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(default_value_t = 5154)]
    port: u16,

    /// Receive timeout in seconds (0 blocks indefinitely)
    #[arg(short, long, default_value_t = 10.0)]
    timeout: f64,

    /// Additional protocol versions to accept (repeatable)
    #[arg(long = "accept-version")]
    accept_versions: Vec<String>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,bzquery=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let mut builder = QueryConfig::builder()
        .host(args.host.as_str())
        .port(args.port);
    builder = if args.timeout > 0.0 {
        builder.timeout(Duration::from_secs_f64(args.timeout))
    } else {
        builder.no_timeout()
    };
    for version in &args.accept_versions {
        builder = builder.accept_version(version.as_str());
    }
    let config = builder.build();

    if let Err(e) = run(&config) {
        tracing::error!("Query failed: {}", e);
        eprintln!("bzquery: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &QueryConfig) -> bzquery::Result<()> {
    let mut client = QueryClient::connect(config)?;

    println!(
        "Statistics of the BZFS server {} (port {})",
        config.host, config.port
    );
    println!("Protocol {}", client.protocol_version());

    let game = client.query_game()?;

    println!();
    println!("--[ GAME ]{}", "-".repeat(40));
    println!();
    println!("Style: {}", game.style.join(" "));
    println!();
    println!(
        "Max players: {}   Max shots: {}",
        game.max_players, game.max_shots
    );
    println!();
    println!("Teams     Size   Max");
    println!("{}", "-".repeat(20));
    for team in TEAM_NAMES {
        if let Some((size, max)) = game.teams.get(team) {
            println!("{:<8} {:>5} {:>5}", team, size, max);
        }
    }
    if let Some(shake) = &game.shake {
        println!();
        println!(
            "Shaking bad flag: wins: {}, timeout: {}",
            shake.wins, shake.timeout
        );
    }
    println!();
    println!("Max player score: {}", game.max_player_score);
    println!("Max team score: {}", game.max_team_score);
    println!("Max time: {}", game.max_time);
    println!("Time elapsed: {}", game.elapsed_time);

    let (teams, mut players) = client.query_players()?;

    println!();
    println!("--[ TEAMS ]{}", "-".repeat(39));
    println!();
    println!("Teams     Size  Score  Won  Lost");
    println!("{}", "-".repeat(32));
    for team in TEAM_NAMES {
        if let Some(t) = teams.get(team) {
            println!(
                "{:<8} {:>5} {:>5} {:>5} {:>5}",
                team,
                t.size,
                t.score(),
                t.won,
                t.lost
            );
        }
    }

    println!();
    println!("--[ PLAYERS ]{}", "-".repeat(37));
    println!();
    println!("Team     Score   Won  Lost Type       Sign");
    println!("{}", "-".repeat(60));
    players.sort_by_key(|p| std::cmp::Reverse(p.score()));
    for player in &players {
        let mut name = player.callsign.clone();
        if !player.email.is_empty() {
            name.push_str(&format!(" <{}>", player.email));
        }
        println!(
            "{:<8} {:>5} {:>5} {:>5} {:<10} {}",
            player.team,
            player.score(),
            player.won,
            player.lost,
            player.player_type.to_string(),
            name
        );
    }

    Ok(())
}
