//! Agent state.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arena::{Bindings, Position};
use crate::lang::Program;

/// Unique identifier for an agent. Never reused within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side an agent plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Controlled by a submitted program.
    Player,
    /// Spawned by the arena.
    Enemy,
}

/// What decides an agent's action each turn.
#[derive(Debug, Clone)]
pub enum Brain {
    /// The built-in random behaviour.
    Random,
    /// An installed program. Shared between an agent and its duplicates.
    Script(Arc<Program>),
}

/// State for a single agent.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Player or enemy.
    pub kind: AgentKind,
    /// Current tile.
    pub position: Position,
    /// Dead agents stay on the grid until eaten.
    pub dead: bool,
    /// Points from shooting, eating and duplicating.
    pub score: i64,
    /// The player currently controlled by the session.
    pub active: bool,
    /// Persistent variable store.
    pub variables: Bindings,
    /// Decision procedure.
    pub brain: Brain,
    /// Shot during the current turn.
    pub just_shot: bool,
    /// Created during the current turn; does not act until the next one.
    pub just_duplicated: bool,
}

impl Agent {
    /// Create a randomly acting enemy.
    #[must_use]
    pub fn enemy(id: AgentId, position: Position) -> Self {
        Self::new(id, AgentKind::Enemy, position, Brain::Random)
    }

    /// Create an active player running `program`.
    #[must_use]
    pub fn player(id: AgentId, position: Position, program: Arc<Program>) -> Self {
        let mut agent = Self::new(id, AgentKind::Player, position, Brain::Script(program));
        agent.active = true;
        agent
    }

    /// Create an inactive agent with an empty store.
    #[must_use]
    pub fn new(id: AgentId, kind: AgentKind, position: Position, brain: Brain) -> Self {
        Self {
            id,
            kind,
            position,
            dead: false,
            score: 0,
            active: false,
            variables: Bindings::new(),
            brain,
            just_shot: false,
            just_duplicated: false,
        }
    }

    /// Whether the agent is still alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.dead
    }

    /// The installed program, if the agent is scripted.
    #[must_use]
    pub fn program(&self) -> Option<&Program> {
        match &self.brain {
            Brain::Random => None,
            Brain::Script(program) => Some(program),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{Command, Expr};

    #[test]
    fn test_agent_id_display() {
        assert_eq!(AgentId(7).to_string(), "#7");
    }

    #[test]
    fn test_player_is_active_enemy_is_not() {
        let program = Arc::new(Program {
            assignments: Vec::new(),
            body: Expr::Command(Command::Eat),
        });
        let player = Agent::player(AgentId(1), Position::new(0, 0), program);
        let enemy = Agent::enemy(AgentId(2), Position::new(1, 0));

        assert!(player.active);
        assert!(player.program().is_some());
        assert!(!enemy.active);
        assert!(enemy.program().is_none());
        assert!(enemy.is_alive());
    }
}
