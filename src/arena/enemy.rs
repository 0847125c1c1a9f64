//! Built-in random behaviour for unscripted agents.

use rand::Rng;

use crate::arena::{Action, Agent, Decision};

/// Chance of duplicating.
const DUPLICATE_CHANCE: f64 = 0.05;
/// Chance of shooting when not duplicating.
const SHOOT_CHANCE: f64 = 0.1;

/// Pick a random action next to the agent's tile.
///
/// The command is duplicate, else shoot, else move, each decided by its own
/// draw; the direction is chosen by a second cascade (up, right, down, left)
/// that favours the earlier entries.
pub fn random_decision<R: Rng>(agent: &Agent, rng: &mut R) -> Decision {
    let here = agent.position;
    let duplicate = rng.gen_bool(DUPLICATE_CHANCE);
    let shoot = !duplicate && rng.gen_bool(SHOOT_CHANCE);

    let target = if rng.gen_bool(0.25) {
        here.offset(0, -1)
    } else if rng.gen_bool(0.5) {
        here.offset(1, 0)
    } else if rng.gen_bool(0.75) {
        here.offset(0, 1)
    } else {
        here.offset(-1, 0)
    };

    let action = if duplicate {
        Action::Duplicate { to: target }
    } else if shoot {
        Action::Shoot { at: target }
    } else {
        Action::Move { to: target }
    };
    Decision::bare(action)
}
