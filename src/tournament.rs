//! Tournament runner.
//!
//! Provides a pure function interface: `(seed, program, config) -> RoundResult`.
//! Each round is independent, so batches of seeds run in parallel with rayon.

use rayon::prelude::*;
use serde::Serialize;

use crate::arena::{AgentKind, ArenaConfig};
use crate::error::{ArenaError, SubmitError};
use crate::lang::{Parsed, parse_with_limit};
use crate::session::{Session, Submission};

/// Final result of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    /// The seed used for this round.
    pub seed: u64,
    /// The player's score.
    pub score: i64,
    /// Turns played.
    pub turns_played: u32,
    /// Whether the player died.
    pub died: bool,
    /// Whether the player was eaten.
    pub eaten: bool,
    /// Index of the interpretation the disambiguator chose.
    pub selected: usize,
    /// Enemies still alive at the end.
    pub enemies_alive: usize,
}

/// Error type for tournament operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TournamentError {
    /// The configuration is unusable.
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// The program was not accepted.
    #[error(transparent)]
    Submit(#[from] SubmitError),
    /// The session ended the round before it could be played.
    #[error("no round in progress after the program was accepted")]
    NoRound,
}

/// Parse a program once for many rounds.
///
/// # Errors
///
/// Returns an error if the text does not parse or is `quit`.
pub fn compile(source: &str, config: &ArenaConfig) -> Result<Parsed, SubmitError> {
    match parse_with_limit(source, config.max_candidates)? {
        Parsed::Quit => Err(SubmitError::NotAProgram),
        parsed @ Parsed::Candidates(_) => Ok(parsed),
    }
}

/// Play one round of `program` in a fresh session seeded with `seed`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the program is
/// rejected in this arena.
pub fn run_round(seed: u64, program: &Parsed, config: ArenaConfig) -> Result<RoundResult, TournamentError> {
    let mut session = Session::new(config, seed)?;
    session.begin_round();
    let selected = match session.submit_parsed(program)? {
        Submission::Accepted { selected, .. } => selected,
        Submission::Quit => return Err(SubmitError::NotAProgram.into()),
    };

    let report = session
        .play_round(|_, _| {})
        .ok_or(TournamentError::NoRound)?;
    let enemies_alive = session
        .world()
        .agents()
        .iter()
        .filter(|a| a.kind == AgentKind::Enemy && a.is_alive())
        .count();

    Ok(RoundResult {
        seed,
        score: report.score,
        turns_played: report.turns_played,
        died: report.died,
        eaten: report.eaten,
        selected,
        enemies_alive,
    })
}

/// Play `games` rounds with seeds `base_seed..base_seed + games` in parallel.
///
/// Results are in seed order.
///
/// # Errors
///
/// Returns the first error in seed order.
pub fn run_batch(
    base_seed: u64,
    games: u64,
    program: &Parsed,
    config: ArenaConfig,
) -> Result<Vec<RoundResult>, TournamentError> {
    (0..games)
        .into_par_iter()
        .map(|i| run_round(base_seed.wrapping_add(i), program, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ArenaConfig {
        ArenaConfig {
            width: 12,
            height: 8,
            turns_per_round: 15,
            ..ArenaConfig::default()
        }
    }

    #[test]
    fn test_run_round_deterministic() {
        let program = compile("shoot find enemy", &config()).unwrap();
        let a = run_round(42, &program, config()).unwrap();
        let b = run_round(42, &program, config()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, 42);
        assert!(a.turns_played <= 15);
    }

    #[test]
    fn test_compile_rejects_quit() {
        assert_eq!(compile("quit", &config()), Err(SubmitError::NotAProgram));
    }

    #[test]
    fn test_quit_is_not_a_round() {
        assert_eq!(
            run_round(3, &Parsed::Quit, config()),
            Err(TournamentError::Submit(SubmitError::NotAProgram))
        );
        let program = compile("move here", &config()).unwrap();
        let result = run_round(3, &program, config()).unwrap();
        assert!(result.turns_played > 0);
    }

    #[test]
    fn test_rejected_program() {
        let program = compile("move $missing", &config()).unwrap();
        assert!(matches!(
            run_round(1, &program, config()),
            Err(TournamentError::Submit(SubmitError::Rejected(_)))
        ));
    }

    #[test]
    fn test_batch_matches_sequential() {
        let program = compile("move up -> shoot left", &config()).unwrap();
        let batch = run_batch(100, 6, &program, config()).unwrap();
        assert_eq!(batch.len(), 6);
        for (i, result) in batch.iter().enumerate() {
            let single = run_round(100 + i as u64, &program, config()).unwrap();
            assert_eq!(*result, single);
        }
    }
}
