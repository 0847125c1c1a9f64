//! The arena and its per-turn loop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::arena::{
    Agent, AgentId, Brain, Decision, Effect, Position, World, apply, evaluate, random_decision,
};
use crate::error::{ArenaError, EvalError};
use crate::lang::DEFAULT_MAX_CANDIDATES;

/// Configuration for an arena and the rounds played in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Grid width.
    pub width: u16,
    /// Grid height.
    pub height: u16,
    /// Turns per round, also the length of a disambiguation trial.
    pub turns_per_round: u32,
    /// Enemies spawned when a session starts.
    pub initial_enemies: u32,
    /// Success probability of the geometric draw for extra enemies per round.
    pub spawn_success_probability: f64,
    /// Candidate trees kept per program, first in emission order.
    pub max_candidates: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 20,
            turns_per_round: 25,
            initial_enemies: 5,
            spawn_success_probability: 0.9,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl ArenaConfig {
    /// Check the values an arena cannot be built from.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty grid or a spawn probability outside
    /// `(0, 1]`.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.width == 0 || self.height == 0 {
            return Err(ArenaError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.spawn_success_probability > 0.0 && self.spawn_success_probability <= 1.0) {
            return Err(ArenaError::InvalidSpawnProbability(
                self.spawn_success_probability,
            ));
        }
        Ok(())
    }
}

/// What happened during one turn.
#[derive(Debug, Clone, Default)]
pub struct TurnReport {
    /// Turn index.
    pub turn: u32,
    /// Effect of every action applied, in acting order.
    pub effects: Vec<(AgentId, Effect)>,
    /// Agents whose program failed to evaluate and who idled.
    pub failures: Vec<(AgentId, EvalError)>,
}

/// A world together with the random state that drives it.
#[derive(Debug, Clone)]
pub struct Arena {
    config: ArenaConfig,
    world: World,
    rng: StdRng,
}

impl Arena {
    /// Create an empty arena.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: ArenaConfig, seed: u64) -> Result<Self, ArenaError> {
        config.validate()?;
        let world = World::new(config.width, config.height).ok_or(ArenaError::InvalidDimensions {
            width: config.width,
            height: config.height,
        })?;
        Ok(Self {
            config,
            world,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The random state.
    #[must_use]
    pub const fn rng(&self) -> &StdRng {
        &self.rng
    }

    /// The random state, mutably.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// A uniformly random cell.
    pub fn random_cell(&mut self) -> Position {
        Position::new(
            self.rng.gen_range(0..i64::from(self.world.width())),
            self.rng.gen_range(0..i64::from(self.world.height())),
        )
    }

    /// Spawn `count` enemies on random cells with the given brain.
    pub fn spawn_enemies(&mut self, count: u32, brain: &Brain) -> Vec<AgentId> {
        (0..count)
            .map(|_| {
                let position = self.random_cell();
                let brain = brain.clone();
                self.world.spawn(|id| {
                    let mut enemy = Agent::enemy(id, position);
                    enemy.brain = brain;
                    enemy
                })
            })
            .collect()
    }

    /// Run one turn: every agent acts once, in list order.
    ///
    /// `just_shot` flags from the previous turn are cleared first, so they
    /// stay visible until the next turn starts. An agent created during
    /// this turn is skipped. An installed program that fails to evaluate
    /// leaves its agent idle.
    pub fn run_turn(&mut self, turn: u32) -> TurnReport {
        self.world.clear_just_shot();
        let mut report = TurnReport {
            turn,
            ..TurnReport::default()
        };

        let mut index = 0;
        while let Some(agent) = self.world.agent_at_mut(index) {
            if agent.just_duplicated {
                agent.just_duplicated = false;
                index += 1;
                continue;
            }
            let id = agent.id;
            let brain = agent.brain.clone();

            match self.decide(id, &brain, turn) {
                Ok(decision) => {
                    let effect = apply(&mut self.world, id, decision);
                    report.effects.push((id, effect));
                }
                Err(error) => {
                    warn!(agent = %id, turn, %error, "program failed to evaluate, agent idles");
                    report.failures.push((id, error));
                }
            }

            // The actor's own index can shift when it eats agents listed before it.
            index = self.world.index_of(id).map_or(index, |i| i + 1);
        }

        trace!(turn, agents = self.world.len(), "turn complete");
        report
    }

    fn decide(&mut self, id: AgentId, brain: &Brain, turn: u32) -> Result<Decision, EvalError> {
        match brain {
            Brain::Random => {
                let agent = self.world.get(id).ok_or(EvalError::UnknownAgent(id))?;
                Ok(random_decision(agent, &mut self.rng))
            }
            Brain::Script(program) => evaluate(program, turn, id, &self.world, &mut self.rng),
        }
    }
}
