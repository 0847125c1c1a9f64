//! Runtime values and the actions programs produce.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arena::{Agent, AgentKind, Position};

/// Variable bindings, ordered by name.
pub type Bindings = BTreeMap<String, Value>;

/// A resolved predicate over agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Predicate {
    Alive,
    Dead,
    Player,
    Enemy,
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Whether `agent` satisfies the predicate.
    #[must_use]
    pub fn matches(&self, agent: &Agent) -> bool {
        match self {
            Predicate::Alive => agent.is_alive(),
            Predicate::Dead => agent.dead,
            Predicate::Player => agent.kind == AgentKind::Player,
            Predicate::Enemy => agent.kind == AgentKind::Enemy,
            Predicate::And(a, b) => a.matches(agent) && b.matches(agent),
            Predicate::Or(a, b) => a.matches(agent) || b.matches(agent),
            Predicate::Not(a) => !a.matches(agent),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Alive => write!(f, "alive"),
            Predicate::Dead => write!(f, "dead"),
            Predicate::Player => write!(f, "player"),
            Predicate::Enemy => write!(f, "enemy"),
            Predicate::And(a, b) => write!(f, "({a} and {b})"),
            Predicate::Or(a, b) => write!(f, "({a} or {b})"),
            Predicate::Not(a) => write!(f, "(not {a})"),
        }
    }
}

/// One effect an agent asks for in a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Step onto a tile.
    Move {
        /// Destination.
        to: Position,
    },
    /// Fire along the axis pointing at a tile.
    Shoot {
        /// Aim point.
        at: Position,
    },
    /// Consume dead agents on the own tile.
    Eat,
    /// Copy self onto a tile.
    Duplicate {
        /// Where the copy appears.
        to: Position,
    },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { to } => write!(f, "move {to}"),
            Action::Shoot { at } => write!(f, "shoot {at}"),
            Action::Eat => write!(f, "eat"),
            Action::Duplicate { to } => write!(f, "dup {to}"),
        }
    }
}

/// A value produced by evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Signed integer.
    Integer(i64),
    /// Grid position.
    Position(Position),
    /// Truth value.
    Boolean(bool),
    /// Predicate over agents.
    Predicate(Predicate),
    /// A command's result.
    Action(Action),
}

impl Value {
    /// Human-readable name of the value's kind, used in type errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Position(_) => "position",
            Value::Boolean(_) => "boolean",
            Value::Predicate(_) => "predicate",
            Value::Action(_) => "action",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Position(p) => write!(f, "{p}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Predicate(p) => write!(f, "{p}"),
            Value::Action(a) => write!(f, "{a}"),
        }
    }
}

/// An action together with the bindings to persist before it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// What the agent does.
    pub action: Action,
    /// Variables assigned during evaluation.
    pub bindings: Bindings,
}

impl Decision {
    /// A decision with no bindings.
    #[must_use]
    pub fn bare(action: Action) -> Self {
        Self {
            action,
            bindings: Bindings::new(),
        }
    }
}
