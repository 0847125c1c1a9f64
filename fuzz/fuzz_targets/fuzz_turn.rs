#![no_main]

//! Turn fuzzer.
//!
//! Builds an arbitrary world and applies arbitrary actions, then runs whole
//! turns with random enemies. The executor never fails, so every input must
//! leave the world's invariants intact.

use arbitrary::Arbitrary;
use gridbots::arena::{Action, Decision, Position, apply, check_invariants};
use gridbots::{Agent, AgentId, Arena, ArenaConfig};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    Move { x: i8, y: i8 },
    Shoot { x: i8, y: i8 },
    Eat,
    Duplicate { x: i8, y: i8 },
}

impl FuzzAction {
    fn action(self) -> Action {
        let at = |x: i8, y: i8| Position::new(i64::from(x), i64::from(y));
        match self {
            FuzzAction::Move { x, y } => Action::Move { to: at(x, y) },
            FuzzAction::Shoot { x, y } => Action::Shoot { at: at(x, y) },
            FuzzAction::Eat => Action::Eat,
            FuzzAction::Duplicate { x, y } => Action::Duplicate { to: at(x, y) },
        }
    }
}

/// Structured input for turn fuzzing.
#[derive(Arbitrary, Debug)]
struct TurnInput {
    seed: u64,
    width: u8,
    height: u8,
    /// Initial agents: position and whether they start dead.
    agents: Vec<(u8, u8, bool)>,
    /// Actions applied as (actor index, action).
    actions: Vec<(u8, FuzzAction)>,
    /// Whole turns to run afterwards.
    turns: u8,
}

fuzz_target!(|input: TurnInput| {
    let config = ArenaConfig {
        width: u16::from(input.width % 16) + 1,
        height: u16::from(input.height % 16) + 1,
        initial_enemies: 0,
        ..ArenaConfig::default()
    };
    let Ok(mut arena) = Arena::new(config, input.seed) else {
        return;
    };

    let mut ids: Vec<AgentId> = Vec::new();
    for &(x, y, dead) in input.agents.iter().take(32) {
        let position = Position::new(
            i64::from(u16::from(x) % config.width),
            i64::from(u16::from(y) % config.height),
        );
        let id = arena.world_mut().spawn(|id| Agent::enemy(id, position));
        if let Some(agent) = arena.world_mut().get_mut(id) {
            agent.dead = dead;
        }
        ids.push(id);
    }
    if ids.is_empty() {
        return;
    }

    for &(actor, action) in input.actions.iter().take(64) {
        let id = ids[usize::from(actor) % ids.len()];
        apply(arena.world_mut(), id, Decision::bare(action.action()));
        // Duplicates are consumed by the turn loop; clear them here instead
        for agent in arena.world_mut().agents_mut() {
            agent.just_duplicated = false;
        }
        let violations = check_invariants(arena.world());
        assert!(violations.is_empty(), "after {action:?}: {violations:?}");
    }

    for turn in 0..u32::from(input.turns % 16) {
        arena.run_turn(turn);
        let violations = check_invariants(arena.world());
        assert!(violations.is_empty(), "after turn {turn}: {violations:?}");
    }
});
