//! Round replay and viewing.
//!
//! Because rounds are deterministic, a replay needs only:
//! - `seed: u64` - the arena's random seed
//! - `program: String` - the submitted program text
//! - `config` - the arena configuration
//!
//! No state deltas are stored. To view turn N, re-run the round from turn 0.
//!
//! # Time Travel
//!
//! - **Forward**: Continue stepping the session
//! - **Backward**: Re-run from turn 0 to (`current_turn` - 1)
//! - **Jump to turn N**: Re-run from turn 0 to N

mod render;
mod text;

pub use render::render_ascii;
pub use text::render_text;

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arena::{AgentId, ArenaConfig, World};
use crate::error::{ArenaError, SubmitError};
use crate::session::{Session, Submission, TurnOutcome};

/// Minimal recording - seed, program text, and config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Arena seed.
    pub seed: u64,
    /// The player's program text.
    pub program: String,
    /// Program run by every enemy instead of the random behaviour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_script: Option<String>,
    /// Arena configuration.
    #[serde(default)]
    pub config: ArenaConfig,
}

impl Recording {
    /// Create a new recording.
    #[must_use]
    pub fn new(seed: u64, program: impl Into<String>, config: ArenaConfig) -> Self {
        Self {
            seed,
            program: program.into(),
            enemy_script: None,
            config,
        }
    }

    /// Run enemies with a program.
    #[must_use]
    pub fn with_enemy_script(mut self, script: impl Into<String>) -> Self {
        self.enemy_script = Some(script.into());
        self
    }

    /// Save the recording as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Load a recording saved with [`Recording::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Error type for replay operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    /// The configuration is unusable.
    #[error("invalid arena: {0}")]
    Arena(#[from] ArenaError),
    /// The player's or the enemies' program was not accepted.
    #[error("program not accepted: {0}")]
    Submit(#[from] SubmitError),
    /// Turn number out of bounds.
    #[error("turn {requested} out of bounds (max: {max_turn})")]
    TurnOutOfBounds {
        /// Requested turn.
        requested: u32,
        /// Maximum turn (inclusive).
        max_turn: u32,
    },
    /// The round is already over.
    #[error("round is already over")]
    RoundOver,
}

/// Replay engine - steps through a round deterministically.
///
/// Since rounds are deterministic, this engine can:
/// - Step forward by playing one turn
/// - Step backward by replaying from turn 0
/// - Jump to any turn by replaying from turn 0
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    recording: Recording,
    session: Session,
    player: AgentId,
    current_turn: u32,
    last_outcome: Option<TurnOutcome>,
}

impl ReplayEngine {
    /// Create a replay engine positioned before the first turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the arena cannot be built or a program is
    /// rejected.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        Self::new_at_turn(recording, 0)
    }

    /// Create a replay engine after `target_turn` turns have been played,
    /// or at the end of the round if it ends sooner.
    ///
    /// # Errors
    ///
    /// See [`ReplayEngine::new`].
    pub fn new_at_turn(recording: Recording, target_turn: u32) -> Result<Self, ReplayError> {
        let mut session = Session::new(recording.config, recording.seed)?;
        if let Some(script) = &recording.enemy_script {
            session.script_enemies(script)?;
        }
        session.begin_round();
        let player = match session.submit(&recording.program)? {
            Submission::Accepted { player, .. } => player,
            Submission::Quit => return Err(SubmitError::NotAProgram.into()),
        };

        let mut engine = Self {
            recording,
            session,
            player,
            current_turn: 0,
            last_outcome: None,
        };
        while engine.current_turn < target_turn && !engine.is_round_over() {
            engine.step_forward()?;
        }
        Ok(engine)
    }

    /// The recording.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Turns played so far.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.current_turn
    }

    /// The round's player.
    #[must_use]
    pub const fn player(&self) -> AgentId {
        self.player
    }

    /// The current world.
    #[must_use]
    pub const fn world(&self) -> &World {
        self.session.world()
    }

    /// The session being replayed.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// What the most recent turn did.
    #[must_use]
    pub const fn last_outcome(&self) -> Option<&TurnOutcome> {
        self.last_outcome.as_ref()
    }

    /// Whether the round has ended.
    #[must_use]
    pub fn is_round_over(&self) -> bool {
        self.session.current_player().is_none()
    }

    /// Step forward one turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the round is already over.
    pub fn step_forward(&mut self) -> Result<&TurnOutcome, ReplayError> {
        let outcome = self.session.step().ok_or(ReplayError::RoundOver)?;
        self.current_turn += 1;
        Ok(self.last_outcome.insert(outcome))
    }

    /// Step backward one turn by replaying from turn 0.
    ///
    /// # Errors
    ///
    /// Returns an error if already at turn 0.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        if self.current_turn == 0 {
            return Err(ReplayError::TurnOutOfBounds {
                requested: 0,
                max_turn: self.recording.config.turns_per_round,
            });
        }
        self.goto_turn(self.current_turn - 1)
    }

    /// Jump to a specific turn by replaying from turn 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is beyond the round length.
    pub fn goto_turn(&mut self, target_turn: u32) -> Result<(), ReplayError> {
        let max_turn = self.recording.config.turns_per_round;
        if target_turn > max_turn {
            return Err(ReplayError::TurnOutOfBounds {
                requested: target_turn,
                max_turn,
            });
        }
        *self = Self::new_at_turn(self.recording.clone(), target_turn)?;
        Ok(())
    }

    /// Render the current world to ANSI-coloured ASCII.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        render_ascii(self.world(), self.current_turn, self.recording.config.turns_per_round)
    }

    /// Render the current world to plain structured text.
    #[must_use]
    pub fn render_text(&self) -> String {
        render_text(self.world(), self.current_turn, self.recording.config.turns_per_round)
    }
}
