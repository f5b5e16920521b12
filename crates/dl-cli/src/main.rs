//! CLI frontend for Dragon's Labyrinth.

mod commands;
mod hexmap;
mod tui;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use dl_core::{HexCoord, NarrativeStage};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "labyrinth",
    about = "Dragon's Labyrinth: a walk that gets darker the further you go",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log more: -v for info, -vv for debug. RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the hex world as an ASCII map
    Map {
        /// World radius in hexes
        #[arg(short, long, default_value = "12")]
        radius: u32,

        /// Stage to skin the terrain for (name or 0-4)
        #[arg(long, default_value = "peace")]
        stage: NarrativeStage,

        /// World seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Find the cheapest walkable path between two hexes
    Path {
        /// Start hex as q,r
        #[arg(allow_hyphen_values = true)]
        from: HexCoord,

        /// Destination hex as q,r
        #[arg(allow_hyphen_values = true)]
        to: HexCoord,

        /// World radius in hexes
        #[arg(short, long, default_value = "12")]
        radius: u32,

        /// Stage to skin the terrain for (name or 0-4)
        #[arg(long, default_value = "peace")]
        stage: NarrativeStage,

        /// World seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Show every stage's look, sound, and advance thresholds
    Stages,

    /// Run a headless session
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "600")]
        ticks: u64,

        /// World seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Waypoint to walk to as q,r; repeat for more, walked in order
        #[arg(short, long, allow_hyphen_values = true)]
        walk: Vec<HexCoord>,

        /// JSON file with simulation settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full event log instead of notable events only
        #[arg(short, long)]
        events: bool,

        /// Print the final snapshot as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Play in the terminal
    Play {
        /// World seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON file with simulation settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Map {
            radius,
            stage,
            seed,
        } => commands::map::run(radius, stage, seed),
        Commands::Path {
            from,
            to,
            radius,
            stage,
            seed,
        } => commands::path::run(from, to, radius, stage, seed),
        Commands::Stages => commands::stages::run(),
        Commands::Simulate {
            ticks,
            seed,
            walk,
            config,
            events,
            json,
        } => commands::simulate::run(ticks, seed, &walk, config.as_deref(), events, json),
        Commands::Play { seed, config } => commands::play::run(seed, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
