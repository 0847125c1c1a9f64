//! Turn simulation for the grid arena.
//!
//! Implements the rules bot programs play by:
//! - Agents (players and enemies) on a bounded grid
//! - Evaluation of an installed program into one action per turn
//! - Action execution (move, shoot, eat, duplicate)
//! - Disambiguation of ambiguous programs by dry run
//! - The per-turn loop over all agents

mod actions;
mod agent;
mod disambiguate;
mod enemy;
mod eval;
mod invariants;
mod turn;
mod value;
mod world;

pub use actions::{Effect, apply};
pub use agent::{Agent, AgentId, AgentKind, Brain};
pub use disambiguate::{Selection, disambiguate};
pub use enemy::random_decision;
pub use eval::evaluate;
pub use invariants::{InvariantViolation, check_invariants};
pub use turn::{Arena, ArenaConfig, TurnReport};
pub use value::{Action, Bindings, Decision, Predicate, Value};
pub use world::{Position, World};
