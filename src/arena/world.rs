//! Grid geometry and the agent store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arena::{Agent, AgentId};

/// A cell coordinate. Programs can compute positions outside the grid, so
/// components are signed and unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i64,
    /// Row, growing downwards.
    pub y: i64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum, `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
        ))
    }

    /// Component-wise difference, `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        Some(Self::new(
            self.x.checked_sub(other.x)?,
            self.y.checked_sub(other.y)?,
        ))
    }

    /// The position shifted by `(dx, dy)`, saturating at the integer range.
    #[must_use]
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The agent set and the grid it lives on.
///
/// Agents are kept in insertion order, which is also the order they act in.
#[derive(Debug, Clone)]
pub struct World {
    width: u16,
    height: u16,
    agents: Vec<Agent>,
    next_id: u64,
}

impl World {
    /// Create an empty world. Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            width,
            height,
            agents: Vec::new(),
            next_id: 0,
        })
    }

    /// Grid width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Whether `position` is a cell of the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        (0..i64::from(self.width)).contains(&position.x)
            && (0..i64::from(self.height)).contains(&position.y)
    }

    /// All agents in acting order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// All agents in acting order, mutably.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Number of agents, dead ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether there are no agents at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Look up an agent.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Look up an agent mutably.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// Index of an agent in acting order.
    #[must_use]
    pub fn index_of(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id == id)
    }

    /// Agent at an index in acting order.
    #[must_use]
    pub fn agent_at(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    /// Mutable agent at an index in acting order.
    pub fn agent_at_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.agents.get_mut(index)
    }

    /// The next id [`World::spawn`] or [`World::duplicate`] would hand out.
    #[must_use]
    pub const fn next_id(&self) -> AgentId {
        AgentId(self.next_id)
    }

    /// Allocate a fresh id.
    pub fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append an agent built around a fresh id.
    pub fn spawn(&mut self, build: impl FnOnce(AgentId) -> Agent) -> AgentId {
        let id = self.allocate_id();
        self.agents.push(build(id));
        id
    }

    /// Append a copy of `source` at `position` with a fresh id, marked
    /// inactive and `just_duplicated`. Returns `None` if `source` is unknown.
    pub fn duplicate(&mut self, source: AgentId, position: Position) -> Option<AgentId> {
        let mut child = self.get(source)?.clone();
        let id = self.allocate_id();
        child.id = id;
        child.position = position;
        child.active = false;
        child.just_shot = false;
        child.just_duplicated = true;
        self.agents.push(child);
        Some(id)
    }

    /// Remove an agent, preserving the order of the rest.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let index = self.index_of(id)?;
        Some(self.agents.remove(index))
    }

    /// Whether any live agent stands on `position`.
    #[must_use]
    pub fn has_live_agent_at(&self, position: Position) -> bool {
        self.agents
            .iter()
            .any(|a| a.is_alive() && a.position == position)
    }

    /// Whether any agent, dead or alive, stands on `position`.
    #[must_use]
    pub fn has_agent_at(&self, position: Position) -> bool {
        self.agents.iter().any(|a| a.position == position)
    }

    /// Clear every agent's `just_shot` flag.
    pub fn clear_just_shot(&mut self) {
        for agent in &mut self.agents {
            agent.just_shot = false;
        }
    }
}
