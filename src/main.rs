//! Gridbots CLI - play, check and benchmark bot programs in the arena.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

/// Gridbots - an ambiguous little bot language on a grid
#[derive(Parser, Debug)]
#[command(name = "gridbots")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log more (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive session: type programs, watch them play
    Play {
        #[command(flatten)]
        arena: cli::ArenaArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Delay between turns in milliseconds
        #[arg(long, default_value = "200")]
        delay: u64,

        /// Program file every enemy runs instead of moving at random
        #[arg(long)]
        enemy_script: Option<PathBuf>,
    },

    /// Show how a program parses and which reading the arena picks
    Check {
        /// Program file
        #[arg(required = true)]
        program: PathBuf,

        #[command(flatten)]
        arena: cli::ArenaArgs,

        /// Seed of the arena used for the dry run
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },

    /// Play one round without interaction
    Run {
        /// Program file
        #[arg(required = true)]
        program: PathBuf,

        #[command(flatten)]
        arena: cli::ArenaArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Program file every enemy runs instead of moving at random
        #[arg(long)]
        enemy_script: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Suppress turn-by-turn output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive TUI stepping through one round
    Watch {
        /// Program file
        #[arg(required = true)]
        program: PathBuf,

        #[command(flatten)]
        arena: cli::ArenaArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Program file every enemy runs instead of moving at random
        #[arg(long)]
        enemy_script: Option<PathBuf>,

        /// Turn delay in milliseconds
        #[arg(long, default_value = "500")]
        speed: u64,
    },

    /// Replay a recorded round
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: tui or text
        #[arg(short, long, default_value = "tui")]
        format: cli::ReplayFormat,

        /// Start at specific turn
        #[arg(short, long)]
        turn: Option<u32>,
    },

    /// Play many seeds in parallel and aggregate the scores
    Tournament {
        /// Program file
        #[arg(required = true)]
        program: PathBuf,

        #[command(flatten)]
        arena: cli::ArenaArgs,

        /// Number of rounds to play
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each round)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Play {
            arena,
            seed,
            delay,
            enemy_script,
        } => cli::play::execute(arena.config(), seed, delay, enemy_script),

        Commands::Check { program, arena, seed } => cli::check::execute(program, arena.config(), seed),

        Commands::Run {
            program,
            arena,
            seed,
            enemy_script,
            format,
            save,
            quiet,
        } => cli::run::execute(program, arena.config(), seed, enemy_script, format, save, quiet),

        Commands::Watch {
            program,
            arena,
            seed,
            enemy_script,
            speed,
        } => cli::watch::execute(program, arena.config(), seed, enemy_script, speed),

        Commands::Replay {
            recording,
            format,
            turn,
        } => cli::replay::execute(recording, format, turn),

        Commands::Tournament {
            program,
            arena,
            games,
            seed,
            threads,
            format,
            progress,
        } => cli::tournament::execute(program, arena.config(), games, seed, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
