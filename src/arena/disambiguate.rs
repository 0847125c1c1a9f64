//! Choosing one interpretation of an ambiguous program.
//!
//! Each candidate is dry-run for a full round against a private copy of the
//! world and random state. The first candidate that evaluates on every turn
//! wins; nothing the trial does is kept.

use rand::Rng;
use tracing::debug;

use crate::arena::{AgentId, World, apply, evaluate};
use crate::error::{EvalError, ProgramRejected, TrialFailure};
use crate::lang::Program;

/// The chosen interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The selected tree.
    pub program: Program,
    /// Its index in emission order.
    pub index: usize,
    /// Candidates tried, the selected one included.
    pub trials: usize,
}

/// Select the first candidate that evaluates without error for `turns`
/// turns when run by `agent`.
///
/// Only `agent` acts during a trial. `world` and `rng` are cloned per
/// candidate and left untouched.
///
/// # Errors
///
/// Returns [`ProgramRejected`] listing every candidate's failure if none
/// survives.
pub fn disambiguate<R: Rng + Clone>(
    candidates: &[Program],
    world: &World,
    rng: &R,
    agent: AgentId,
    turns: u32,
) -> Result<Selection, ProgramRejected> {
    let mut failures = Vec::new();

    for (index, program) in candidates.iter().enumerate() {
        match dry_run(program, world, rng, agent, turns) {
            Ok(()) => {
                debug!(candidate = index, %program, "selected interpretation");
                return Ok(Selection {
                    program: program.clone(),
                    index,
                    trials: index + 1,
                });
            }
            Err((turn, error)) => {
                debug!(candidate = index, turn, %error, %program, "interpretation failed");
                failures.push(TrialFailure {
                    candidate: index,
                    turn,
                    error,
                });
            }
        }
    }

    Err(ProgramRejected { failures })
}

fn dry_run<R: Rng + Clone>(
    program: &Program,
    world: &World,
    rng: &R,
    agent: AgentId,
    turns: u32,
) -> Result<(), (u32, EvalError)> {
    let mut scratch = world.clone();
    let mut rng = rng.clone();
    for turn in 0..turns {
        let decision = evaluate(program, turn, agent, &scratch, &mut rng).map_err(|e| (turn, e))?;
        apply(&mut scratch, agent, decision);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::arena::{Agent, Position};
    use crate::lang::parse;

    fn setup(source: &str) -> (Vec<Program>, World, AgentId) {
        let candidates = parse(source).unwrap().candidates().to_vec();
        let mut world = World::new(10, 10).unwrap();
        let placeholder = Arc::new(candidates[0].clone());
        let id = world.spawn(|id| Agent::player(id, Position::new(5, 5), placeholder));
        (candidates, world, id)
    }

    #[test]
    fn test_unambiguous_program_takes_one_trial() {
        let (candidates, world, id) = setup("move (tick % 10, 0)");
        assert_eq!(candidates.len(), 1);
        let rng = StdRng::seed_from_u64(0);
        let selection = disambiguate(&candidates, &world, &rng, id, 25).unwrap();
        assert_eq!(selection.index, 0);
        assert_eq!(selection.trials, 1);
    }

    #[test]
    fn test_failing_reading_is_skipped() {
        // `here - up` as arithmetic fails; as direction difference it works.
        let (candidates, world, id) = setup("move here - up");
        assert!(candidates.len() >= 2);
        let rng = StdRng::seed_from_u64(0);
        let selection = disambiguate(&candidates, &world, &rng, id, 5).unwrap();
        assert_eq!(selection.program.to_string(), "(move (dir- here up))");
    }

    #[test]
    fn test_rejection_lists_every_candidate() {
        let (candidates, world, id) = setup("move $missing");
        let rng = StdRng::seed_from_u64(0);
        let rejected = disambiguate(&candidates, &world, &rng, id, 5).unwrap_err();
        assert_eq!(rejected.failures.len(), candidates.len());
        let first = rejected.first_failure().unwrap();
        assert_eq!(first.turn, 0);
        assert_eq!(first.error, EvalError::UnboundVariable("missing".to_string()));
    }

    #[test]
    fn test_unbound_variable_in_untaken_branch_rejects() {
        let (candidates, world, id) = setup("if tick > 2 then move $later else move here");
        let rng = StdRng::seed_from_u64(0);
        let rejected = disambiguate(&candidates, &world, &rng, id, 5).unwrap_err();
        assert!(rejected.failures.iter().all(|f| f.turn == 0));
    }

    #[test]
    fn test_trial_does_not_touch_world() {
        let (candidates, world, id) = setup("move left");
        let before = world.get(id).unwrap().position;
        let rng = StdRng::seed_from_u64(0);
        disambiguate(&candidates, &world, &rng, id, 25).unwrap();
        assert_eq!(world.get(id).unwrap().position, before);
    }
}
