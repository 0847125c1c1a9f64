//! World invariants - sanity checks that detect rule bugs.
//!
//! These should never trigger after any sequence of turns. Tests and fuzz
//! targets run them after every turn.

use std::collections::HashSet;

use thiserror::Error;

use crate::arena::{AgentKind, World};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();
    let mut active = 0;

    for agent in world.agents() {
        // Leaving the grid kills in place, so even corpses stay in bounds.
        if !world.contains(agent.position) {
            violations.push(InvariantViolation::new(format!(
                "agent {} at {} is outside the {}x{} grid",
                agent.id,
                agent.position,
                world.width(),
                world.height()
            )));
        }

        if !seen.insert(agent.id) {
            violations.push(InvariantViolation::new(format!(
                "agent id {} appears more than once",
                agent.id
            )));
        }

        if agent.id >= world.next_id() {
            violations.push(InvariantViolation::new(format!(
                "agent id {} was never allocated",
                agent.id
            )));
        }

        if agent.active {
            active += 1;
            if agent.kind != AgentKind::Player {
                violations.push(InvariantViolation::new(format!(
                    "enemy {} is marked active",
                    agent.id
                )));
            }
        }

        if agent.just_duplicated {
            violations.push(InvariantViolation::new(format!(
                "agent {} kept its duplication flag past a turn",
                agent.id
            )));
        }
    }

    if active > 1 {
        violations.push(InvariantViolation::new(format!(
            "{active} players are active at once"
        )));
    }

    violations
}
