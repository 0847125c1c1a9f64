//! Rounds of play in one arena.
//!
//! A session owns the arena across rounds: it spawns enemies, installs each
//! submitted program as a new player, runs the round turn by turn, and keeps
//! the running score. Players from earlier rounds stay in the world,
//! inactive, until something eats them.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::arena::{
    Agent, AgentId, AgentKind, Arena, ArenaConfig, Brain, Selection, TurnReport, World,
    disambiguate,
};
use crate::error::{ArenaError, ProgramRejected, SubmitError};
use crate::lang::{Parsed, Program, parse_with_limit};

/// Outcome of submitting program text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The text was `quit` or `exit`.
    Quit,
    /// A player was placed and is ready to play the round.
    Accepted {
        /// The new player.
        player: AgentId,
        /// Number of candidate trees the text parsed to.
        candidates: usize,
        /// Index of the selected candidate.
        selected: usize,
    },
}

/// Summary of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    /// The round's player.
    pub player: AgentId,
    /// Turns actually played.
    pub turns_played: u32,
    /// The player's score at the end of the round.
    pub score: i64,
    /// Whether the player died during the round.
    pub died: bool,
    /// Whether the player was eaten, which ends the round early.
    pub eaten: bool,
    /// Session score after this round.
    pub total_score: i64,
}

/// One turn of a round in progress.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// What the turn did.
    pub report: TurnReport,
    /// Set when this turn ended the round.
    pub round_over: Option<RoundReport>,
}

#[derive(Debug, Clone, Copy)]
struct Round {
    player: AgentId,
    turn: u32,
    score: i64,
}

/// A sequence of rounds in one arena.
#[derive(Debug, Clone)]
pub struct Session {
    arena: Arena,
    enemy_brain: Brain,
    round: Option<Round>,
    rounds_played: u32,
    total_score: i64,
}

impl Session {
    /// Create a session and spawn the initial enemies.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: ArenaConfig, seed: u64) -> Result<Self, ArenaError> {
        let mut arena = Arena::new(config, seed)?;
        arena.spawn_enemies(config.initial_enemies, &Brain::Random);
        Ok(Self {
            arena,
            enemy_brain: Brain::Random,
            round: None,
            rounds_played: 0,
            total_score: 0,
        })
    }

    /// The arena.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &World {
        self.arena.world()
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &ArenaConfig {
        self.arena.config()
    }

    /// Score accumulated over finished rounds.
    #[must_use]
    pub const fn total_score(&self) -> i64 {
        self.total_score
    }

    /// Rounds finished so far.
    #[must_use]
    pub const fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// The player of the round in progress.
    #[must_use]
    pub fn current_player(&self) -> Option<AgentId> {
        self.round.map(|r| r.player)
    }

    /// Turn index the next [`Session::step`] will play.
    #[must_use]
    pub fn current_turn(&self) -> Option<u32> {
        self.round.map(|r| r.turn)
    }

    /// Run every enemy, present and future, with a program instead of the
    /// random behaviour.
    ///
    /// The program is disambiguated against an existing enemy, or a
    /// temporary one if there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a program or no interpretation
    /// evaluates.
    pub fn script_enemies(&mut self, source: &str) -> Result<(), SubmitError> {
        let candidates = match parse_with_limit(source, self.config().max_candidates)? {
            Parsed::Quit => return Err(SubmitError::NotAProgram),
            Parsed::Candidates(candidates) => candidates,
        };

        let existing = self
            .world()
            .agents()
            .iter()
            .find(|a| a.kind == AgentKind::Enemy)
            .map(|a| a.id);
        let probe = match existing {
            Some(id) => id,
            None => {
                let position = self.arena.random_cell();
                self.arena
                    .world_mut()
                    .spawn(|id| Agent::enemy(id, position))
            }
        };

        let selection = disambiguate(
            &candidates,
            self.world(),
            self.arena.rng(),
            probe,
            self.config().turns_per_round,
        );
        if existing.is_none() {
            self.arena.world_mut().remove(probe);
        }
        let brain = Brain::Script(Arc::new(selection?.program));

        for agent in self.arena.world_mut().agents_mut() {
            if agent.kind == AgentKind::Enemy {
                agent.brain = brain.clone();
            }
        }
        self.enemy_brain = brain;
        Ok(())
    }

    /// Prepare the next round: clear last round's shot markers and spawn
    /// a geometric number of extra enemies. Returns how many were spawned.
    pub fn begin_round(&mut self) -> u32 {
        self.arena.world_mut().clear_just_shot();
        let p = self.config().spawn_success_probability;
        let mut extra = 0;
        while !self.arena.rng_mut().gen_bool(p) {
            extra += 1;
        }
        self.arena.spawn_enemies(extra, &self.enemy_brain);
        debug!(extra, agents = self.world().len(), "round prepared");
        extra
    }

    /// Parse, place and disambiguate a program.
    ///
    /// On success the new player stands on a random cell, active, ready for
    /// [`Session::step`]. On failure the world is unchanged apart from the
    /// random state.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or no interpretation
    /// survives the dry run.
    pub fn submit(&mut self, source: &str) -> Result<Submission, SubmitError> {
        let parsed = parse_with_limit(source, self.config().max_candidates)?;
        self.submit_parsed(&parsed)
    }

    /// [`Session::submit`] for text that is already parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if no interpretation survives the dry run.
    pub fn submit_parsed(&mut self, parsed: &Parsed) -> Result<Submission, SubmitError> {
        let candidates = match parsed {
            Parsed::Quit => return Ok(Submission::Quit),
            Parsed::Candidates(candidates) => candidates,
        };
        let Some(first) = candidates.first() else {
            return Err(ProgramRejected { failures: Vec::new() }.into());
        };
        self.end_round_early();

        let position = self.arena.random_cell();
        let placeholder = Arc::new(first.clone());
        let player = self
            .arena
            .world_mut()
            .spawn(|id| Agent::player(id, position, placeholder));

        let selection = disambiguate(
            candidates,
            self.world(),
            self.arena.rng(),
            player,
            self.config().turns_per_round,
        );
        let Selection { program, index, .. } = match selection {
            Ok(selection) => selection,
            Err(rejected) => {
                self.arena.world_mut().remove(player);
                return Err(rejected.into());
            }
        };

        self.install(player, program);
        info!(%player, %position, candidates = candidates.len(), selected = index, "player placed");
        self.round = Some(Round {
            player,
            turn: 0,
            score: 0,
        });
        Ok(Submission::Accepted {
            player,
            candidates: candidates.len(),
            selected: index,
        })
    }

    fn install(&mut self, player: AgentId, program: Program) {
        if let Some(agent) = self.arena.world_mut().get_mut(player) {
            agent.brain = Brain::Script(Arc::new(program));
        }
    }

    /// Play one turn of the round in progress. Returns `None` if no round
    /// is in progress.
    pub fn step(&mut self) -> Option<TurnOutcome> {
        let mut round = self.round?;
        let report = self.arena.run_turn(round.turn);
        round.turn += 1;

        let player = self.world().get(round.player);
        if let Some(player) = player {
            round.score = player.score;
        }
        let eaten = player.is_none();

        let round_over = if eaten || round.turn >= self.config().turns_per_round {
            Some(self.finish(round, eaten))
        } else {
            self.round = Some(round);
            None
        };
        Some(TurnOutcome { report, round_over })
    }

    /// Play the round in progress to the end, calling `observe` after every
    /// turn. Returns `None` if no round is in progress.
    pub fn play_round(&mut self, mut observe: impl FnMut(&World, &TurnOutcome)) -> Option<RoundReport> {
        loop {
            let outcome = self.step()?;
            observe(self.world(), &outcome);
            if let Some(report) = outcome.round_over {
                return Some(report);
            }
        }
    }

    fn finish(&mut self, round: Round, eaten: bool) -> RoundReport {
        let died = match self.arena.world_mut().get_mut(round.player) {
            Some(player) => {
                player.active = false;
                player.dead
            }
            None => true,
        };
        self.round = None;
        self.rounds_played += 1;
        self.total_score += round.score;
        info!(player = %round.player, score = round.score, total = self.total_score, eaten, "round over");
        RoundReport {
            player: round.player,
            turns_played: round.turn,
            score: round.score,
            died,
            eaten,
            total_score: self.total_score,
        }
    }

    /// A new submission abandons any round still in progress.
    fn end_round_early(&mut self) {
        if let Some(round) = self.round {
            let eaten = self.world().get(round.player).is_none();
            self.finish(round, eaten);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::check_invariants;
    use crate::error::ParseError;

    fn small() -> ArenaConfig {
        ArenaConfig {
            width: 8,
            height: 6,
            turns_per_round: 10,
            ..ArenaConfig::default()
        }
    }

    #[test]
    fn test_new_session_spawns_initial_enemies() {
        let session = Session::new(small(), 1).unwrap();
        assert_eq!(session.world().len(), 5);
        assert!(session.world().agents().iter().all(|a| a.kind == AgentKind::Enemy));
    }

    #[test]
    fn test_quit() {
        let mut session = Session::new(small(), 1).unwrap();
        assert_eq!(session.submit("quit").unwrap(), Submission::Quit);
        assert_eq!(session.submit(" exit ").unwrap(), Submission::Quit);
    }

    #[test]
    fn test_parse_error_leaves_world_alone() {
        let mut session = Session::new(small(), 1).unwrap();
        let err = session.submit("move (").unwrap_err();
        assert_eq!(err, SubmitError::Parse(ParseError::NoDerivation));
        assert_eq!(session.world().len(), 5);
    }

    #[test]
    fn test_rejected_program_removes_player() {
        let mut session = Session::new(small(), 1).unwrap();
        let err = session.submit("move $nope").unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(_)));
        assert_eq!(session.world().len(), 5);
        assert!(session.current_player().is_none());
    }

    #[test]
    fn test_round_runs_to_completion() {
        let mut session = Session::new(small(), 3).unwrap();
        session.begin_round();
        let Submission::Accepted { player, .. } = session.submit("move here").unwrap() else {
            panic!("expected a player");
        };
        assert!(session.world().get(player).unwrap().active);

        let mut turns = 0;
        let report = session
            .play_round(|world, _| {
                turns += 1;
                assert!(check_invariants(world).is_empty());
            })
            .unwrap();

        assert_eq!(report.turns_played, turns);
        assert!(report.eaten || turns == 10);
        assert_eq!(session.total_score(), report.score);
        assert_eq!(session.rounds_played(), 1);
        if let Some(agent) = session.world().get(player) {
            assert!(!agent.active);
        }
        assert!(session.step().is_none());
    }

    #[test]
    fn test_scores_accumulate_across_rounds() {
        let mut session = Session::new(small(), 5).unwrap();
        let mut expected = 0;
        for _ in 0..3 {
            session.begin_round();
            session.submit("shoot find enemy").unwrap();
            let report = session.play_round(|_, _| {}).unwrap();
            expected += report.score;
            assert_eq!(report.total_score, expected);
        }
        assert_eq!(session.total_score(), expected);
        let players = session
            .world()
            .agents()
            .iter()
            .filter(|a| a.kind == AgentKind::Player && a.active)
            .count();
        assert_eq!(players, 0);
    }

    #[test]
    fn test_scripted_enemies() {
        let mut session = Session::new(small(), 2).unwrap();
        session.script_enemies("move here").unwrap();
        let before: Vec<_> = session.world().agents().iter().map(|a| a.position).collect();
        session.submit("move here").unwrap();
        session.step().unwrap();
        let after: Vec<_> = session
            .world()
            .agents()
            .iter()
            .filter(|a| a.kind == AgentKind::Enemy)
            .map(|a| a.position)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_quit_is_not_an_enemy_script() {
        let mut session = Session::new(small(), 2).unwrap();
        assert_eq!(session.script_enemies("quit"), Err(SubmitError::NotAProgram));
    }

    #[test]
    fn test_same_seed_same_round() {
        let play = || {
            let mut session = Session::new(small(), 77).unwrap();
            session.begin_round();
            session.submit("move left -> move up -> shoot right").unwrap();
            session.play_round(|_, _| {}).unwrap()
        };
        assert_eq!(play(), play());
    }
}
