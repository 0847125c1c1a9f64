//! CLI command implementations for Gridbots.

pub(crate) mod check;
pub(crate) mod play;
pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod tournament;
pub(crate) mod watch;

mod output;

use clap::{Args, ValueEnum};
use gridbots::ArenaConfig;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

/// Arena settings shared by every command that builds an arena.
#[derive(Args, Debug, Clone, Copy, Default)]
pub(crate) struct ArenaArgs {
    /// Grid width (default: 40)
    #[arg(long)]
    width: Option<u16>,

    /// Grid height (default: 20)
    #[arg(long)]
    height: Option<u16>,

    /// Turns per round (default: 25)
    #[arg(short, long)]
    turns: Option<u32>,

    /// Enemies at session start (default: 5)
    #[arg(long)]
    enemies: Option<u32>,

    /// Success probability of the per-round enemy spawn draw (default: 0.9)
    #[arg(long)]
    spawn_probability: Option<f64>,

    /// Parse trees kept per program, first readings first (default: 4096)
    #[arg(long)]
    max_candidates: Option<usize>,
}

impl ArenaArgs {
    /// Defaults overridden by whatever flags were given.
    pub(crate) fn config(self) -> ArenaConfig {
        let defaults = ArenaConfig::default();
        ArenaConfig {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            turns_per_round: self.turns.unwrap_or(defaults.turns_per_round),
            initial_enemies: self.enemies.unwrap_or(defaults.initial_enemies),
            spawn_success_probability: self
                .spawn_probability
                .unwrap_or(defaults.spawn_success_probability),
            max_candidates: self.max_candidates.unwrap_or(defaults.max_candidates),
        }
    }
}

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Interactive TUI.
    Tui,
    /// Plain text output.
    Text,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Read a program file.
pub(crate) fn read_program(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))
}

/// The given seed, or one drawn from the clock.
pub(crate) fn seed_or_now(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
            .unwrap_or(42)
    })
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<gridbots::ArenaError> for CliError {
    fn from(e: gridbots::ArenaError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<gridbots::ParseError> for CliError {
    fn from(e: gridbots::ParseError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<gridbots::SubmitError> for CliError {
    fn from(e: gridbots::SubmitError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<gridbots::tournament::TournamentError> for CliError {
    fn from(e: gridbots::tournament::TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<gridbots::replay::ReplayError> for CliError {
    fn from(e: gridbots::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
